use crate::error::{IntegrationError, Result};
use shared::settings::SPLUNK_ACCOUNT_PLACEHOLDER;
use std::fs;
use std::path::Path;

/// Reads a JSON policy document and returns it re-serialized.
pub fn load_policy_document(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path).map_err(|source| IntegrationError::Document {
        path: path.to_path_buf(),
        source,
    })?;

    let document: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| IntegrationError::InvalidDocument {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(document.to_string())
}

/// Reads the assume-role template and points it at the external account.
pub fn load_trust_policy(path: &Path, external_account: &str) -> Result<String> {
    let document = load_policy_document(path)?;
    Ok(document.replace(SPLUNK_ACCOUNT_PLACEHOLDER, external_account))
}
