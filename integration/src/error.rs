use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = IntegrationError> = std::result::Result<T, E>;

/// An access-control or API fault reported by AWS.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderFault {
    pub message: String,
}

impl ProviderFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error(transparent)]
    Provider(#[from] ProviderFault),

    #[error("Policy document {} could not be read: {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Policy document {} is not valid JSON: {source}", .path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("SPLUNK_AWS_ACCOUNT is not configured, the role trust policy cannot be built")]
    MissingExternalAccount,

    #[error("'{0}' is not a usable account ID")]
    InvalidAccountId(String),

    #[error("Could not stage {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
