use crate::bootstrap::{Bootstrap, Bootstrapper, IamApi};
use crate::error::{IntegrationError, Result};
use crate::publisher::{log_new_account, validate_account_id, ObjectStore};
use shared::settings::Settings;
use tracing::{error, info};

/// Bootstraps the Splunk read role in the event's account and records it.
///
/// AWS faults are turned into the returned message rather than an error;
/// only bad configuration, documents or input come back as `Err`.
pub async fn integrate_account(
    account_id: &str,
    settings: &Settings,
    iam: &dyn IamApi,
    store: &dyn ObjectStore,
) -> Result<String> {
    validate_account_id(account_id)?;

    info!("Integrating account {} with Splunk", account_id);

    let role_arn = match Bootstrapper::new(iam, settings).bootstrap().await {
        Ok(Bootstrap::Created(role_arn)) => role_arn,
        Ok(Bootstrap::AlreadyExists(message)) => return Ok(message),
        Err(IntegrationError::Provider(fault)) => {
            error!("IAM call failed: {}", fault);
            return Ok(format!(
                "IAM ERROR: Please ensure the event payload has correct admin Access & Secret Keys and Token: \n{}",
                fault
            ));
        }
        Err(e) => return Err(e),
    };

    match log_new_account(&role_arn, account_id, settings, store).await {
        Ok(()) => {}
        Err(IntegrationError::Provider(fault)) => {
            error!("S3 upload failed: {}", fault);
            return Ok(format!(
                "S3 ERROR: Problem uploading to S3. Check permissions: {}",
                fault
            ));
        }
        Err(e) => return Err(e),
    }

    Ok(format!("Successfully integrated {} with Splunk", account_id))
}
