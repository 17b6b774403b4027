use crate::aws::provider_fault;
use crate::error::{IntegrationError, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use shared::settings::Settings;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Durable storage for integration records.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads the file at `path`, replacing any object already at `key`.
    async fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> Result<()>;
}

pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| IntegrationError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, e),
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(provider_fault)?;

        Ok(())
    }
}

/// Rejects account IDs that cannot be used as a staging file name or object key.
pub fn validate_account_id(account_id: &str) -> Result<()> {
    if account_id.is_empty()
        || account_id == "."
        || account_id == ".."
        || account_id.contains(['/', '\\'])
    {
        return Err(IntegrationError::InvalidAccountId(account_id.to_string()));
    }
    Ok(())
}

/// Records the role ARN for an account, keyed by the account ID.
pub async fn log_new_account(
    role_arn: &str,
    account_id: &str,
    settings: &Settings,
    store: &dyn ObjectStore,
) -> Result<()> {
    validate_account_id(account_id)?;

    let path = settings.staging_dir.join(account_id);
    fs::write(&path, role_arn.as_bytes()).map_err(|source| IntegrationError::Io {
        path: path.clone(),
        source,
    })?;

    store.upload_file(&path, &settings.bucket, account_id).await?;

    warn!("A new entry has been added in {}", settings.bucket);
    Ok(())
}
