use crate::error::ProviderFault;
use aws_credential_types::Credentials;
use aws_sdk_iam::config::Region;
use aws_sdk_iam::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;
use shared::events::IntegrateEvent;
use std::fmt::Debug;

/// SDK config acting as whoever issued the event's keys.
pub async fn delegated_config(event: &IntegrateEvent, region: &str) -> aws_config::SdkConfig {
    let credentials = Credentials::new(
        &event.access_key,
        &event.secret_key,
        Some(event.session_token.clone()),
        None,
        "integrate-event",
    );

    aws_config::from_env()
        .region(Region::new(region.to_owned()))
        .credentials_provider(credentials)
        .load()
        .await
}

/// SDK config for the process's own identity.
pub async fn own_config() -> aws_config::SdkConfig {
    aws_config::from_env().load().await
}

/// Prefers the service's own error message, falling back to the full context.
pub fn provider_fault<E, R>(err: SdkError<E, R>) -> ProviderFault
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let message = match &err {
        SdkError::ServiceError(service_err) => service_err.err().message().map(str::to_owned),
        _ => None,
    };

    ProviderFault::new(message.unwrap_or_else(|| DisplayErrorContext(&err).to_string()))
}
