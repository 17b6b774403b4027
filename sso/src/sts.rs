use crate::error::{Result, SsoError};
use crate::saml_response::Role;
use async_trait::async_trait;
use aws_sdk_sts::config::Region;
use aws_smithy_types::date_time::Format;
use aws_smithy_types::error::display::DisplayErrorContext;
use chrono::{DateTime, Utc};
use std::fmt::{Debug, Formatter};
use tracing::info;

/// Short-lived keys returned by the federation exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime<Utc>>,
}

impl Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key", &self.access_key)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

/// Trades a SAML assertion for credentials scoped to one role.
#[async_trait]
pub trait SamlFederation: Send + Sync {
    async fn assume_role_with_saml(
        &self,
        role: &Role,
        assertion: &str,
    ) -> Result<TemporaryCredentials>;
}

pub struct StsFederation {
    client: aws_sdk_sts::Client,
}

impl StsFederation {
    /// The assertion is the only proof of identity, so the client is unsigned.
    pub async fn new(region: &str) -> Self {
        let config = aws_config::from_env()
            .region(Region::new(region.to_owned()))
            .no_credentials()
            .load()
            .await;

        Self {
            client: aws_sdk_sts::Client::new(&config),
        }
    }
}

#[async_trait]
impl SamlFederation for StsFederation {
    async fn assume_role_with_saml(
        &self,
        role: &Role,
        assertion: &str,
    ) -> Result<TemporaryCredentials> {
        let assume_role_response = self
            .client
            .assume_role_with_saml()
            .role_arn(&role.role_arn)
            .principal_arn(&role.principal_arn)
            .saml_assertion(assertion)
            .send()
            .await
            .map_err(|e| SsoError::CredentialExchange(DisplayErrorContext(&e).to_string()))?;

        let credentials = assume_role_response.credentials.ok_or_else(|| {
            SsoError::CredentialExchange("No credentials found in assume role response".into())
        })?;

        let access_key = credentials.access_key_id.ok_or_else(|| {
            SsoError::CredentialExchange("No access key ID found in assume role response".into())
        })?;

        let secret_key = credentials.secret_access_key.ok_or_else(|| {
            SsoError::CredentialExchange(
                "No secret access key found in assume role response".into(),
            )
        })?;

        let session_token = credentials.session_token.ok_or_else(|| {
            SsoError::CredentialExchange("No session token found in assume role response".into())
        })?;

        let expiration = credentials
            .expiration
            .and_then(|dt| dt.fmt(Format::DateTime).ok())
            .and_then(|dt| DateTime::parse_from_rfc3339(&dt).ok())
            .map(|dt| dt.with_timezone(&Utc));

        if let Some(expiration) = expiration {
            info!("Temporary credentials for {} expire at {}", role.role_arn, expiration);
        }

        Ok(TemporaryCredentials {
            access_key,
            secret_key,
            session_token,
            expiration,
        })
    }
}
