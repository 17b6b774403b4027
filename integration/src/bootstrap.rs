use crate::aws::provider_fault;
use crate::documents::{load_policy_document, load_trust_policy};
use crate::error::{IntegrationError, ProviderFault, Result};
use async_trait::async_trait;
use aws_sdk_iam::types::PolicyScopeType;
use shared::settings::Settings;
use tracing::{info, warn};

const POLICY_DESCRIPTION: &str = "The policy attached to the Splunk read all role";

/// Largest page IAM hands back for list calls.
const MAX_ITEMS: i32 = 1000;

/// The IAM calls the bootstrapper relies on.
#[async_trait]
pub trait IamApi: Send + Sync {
    async fn list_policy_names(&self) -> Result<Vec<String>, ProviderFault>;

    /// Returns the new policy's ARN.
    async fn create_policy(
        &self,
        name: &str,
        document: &str,
        description: &str,
    ) -> Result<String, ProviderFault>;

    async fn list_role_names(&self) -> Result<Vec<String>, ProviderFault>;

    /// Returns the new role's ARN.
    async fn create_role(&self, name: &str, trust_document: &str) -> Result<String, ProviderFault>;

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str)
        -> Result<(), ProviderFault>;
}

pub struct IamClient {
    client: aws_sdk_iam::Client,
}

impl IamClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_iam::Client::new(config),
        }
    }
}

#[async_trait]
impl IamApi for IamClient {
    async fn list_policy_names(&self) -> Result<Vec<String>, ProviderFault> {
        // Only customer managed policies can clash with ours.
        let output = self
            .client
            .list_policies()
            .scope(PolicyScopeType::Local)
            .max_items(MAX_ITEMS)
            .send()
            .await
            .map_err(provider_fault)?;

        Ok(output
            .policies()
            .unwrap_or_default()
            .iter()
            .filter_map(|policy| policy.policy_name())
            .map(str::to_owned)
            .collect())
    }

    async fn create_policy(
        &self,
        name: &str,
        document: &str,
        description: &str,
    ) -> Result<String, ProviderFault> {
        let output = self
            .client
            .create_policy()
            .policy_name(name)
            .policy_document(document)
            .description(description)
            .send()
            .await
            .map_err(provider_fault)?;

        output
            .policy()
            .and_then(|policy| policy.arn())
            .map(str::to_owned)
            .ok_or_else(|| ProviderFault::new("No policy ARN found in create policy response"))
    }

    async fn list_role_names(&self) -> Result<Vec<String>, ProviderFault> {
        let output = self
            .client
            .list_roles()
            .max_items(MAX_ITEMS)
            .send()
            .await
            .map_err(provider_fault)?;

        Ok(output
            .roles()
            .unwrap_or_default()
            .iter()
            .filter_map(|role| role.role_name())
            .map(str::to_owned)
            .collect())
    }

    async fn create_role(&self, name: &str, trust_document: &str) -> Result<String, ProviderFault> {
        let output = self
            .client
            .create_role()
            .role_name(name)
            .assume_role_policy_document(trust_document)
            .send()
            .await
            .map_err(provider_fault)?;

        output
            .role()
            .and_then(|role| role.arn())
            .map(str::to_owned)
            .ok_or_else(|| ProviderFault::new("No role ARN found in create role response"))
    }

    async fn attach_role_policy(
        &self,
        role_name: &str,
        policy_arn: &str,
    ) -> Result<(), ProviderFault> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(provider_fault)?;

        Ok(())
    }
}

/// Outcome of a create-once step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bootstrap {
    /// Carries the ARN of the resource just created.
    Created(String),
    /// Carries the warning explaining why nothing further was done.
    AlreadyExists(String),
}

/// Creates the Splunk read policy and role in the account the IAM client
/// acts on. Never updates: an existing policy or role ends the run early.
///
/// The existence check and the create are two separate calls, so two
/// concurrent runs against one account can race.
pub struct Bootstrapper<'a> {
    iam: &'a dyn IamApi,
    settings: &'a Settings,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(iam: &'a dyn IamApi, settings: &'a Settings) -> Self {
        Self { iam, settings }
    }

    /// Policy first, then the role it is attached to.
    pub async fn bootstrap(&self) -> Result<Bootstrap> {
        let external_account = self
            .settings
            .splunk_account
            .as_deref()
            .ok_or(IntegrationError::MissingExternalAccount)?;

        match self.create_policy().await? {
            Bootstrap::Created(policy_arn) => self.create_role(&policy_arn, external_account).await,
            exists => Ok(exists),
        }
    }

    pub async fn create_policy(&self) -> Result<Bootstrap> {
        let name = &self.settings.policy_name;

        if self.iam.list_policy_names().await?.iter().any(|p| p == name) {
            let message = format!("The policy {} already exists", name);
            warn!("{}", message);
            return Ok(Bootstrap::AlreadyExists(message));
        }

        let document = load_policy_document(&self.settings.policy_document)?;
        let policy_arn = self
            .iam
            .create_policy(name, &document, POLICY_DESCRIPTION)
            .await?;

        warn!("The Policy {} has been created", policy_arn);
        Ok(Bootstrap::Created(policy_arn))
    }

    pub async fn create_role(&self, policy_arn: &str, external_account: &str) -> Result<Bootstrap> {
        let name = &self.settings.role_name;

        if self.iam.list_role_names().await?.iter().any(|r| r == name) {
            let message = format!("The role {} already exists", name);
            warn!("{}", message);
            return Ok(Bootstrap::AlreadyExists(message));
        }

        let trust_document =
            load_trust_policy(&self.settings.assume_role_document, external_account)?;
        let role_arn = self.iam.create_role(name, &trust_document).await?;

        info!("Attaching {} to {}", policy_arn, name);
        self.iam.attach_role_policy(name, policy_arn).await?;

        warn!("The Role {} has been created", role_arn);
        Ok(Bootstrap::Created(role_arn))
    }
}
