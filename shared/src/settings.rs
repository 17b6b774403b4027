use anyhow::{bail, Result};
use std::path::PathBuf;

/// Token in the trust policy template replaced by the Splunk account ID.
pub const SPLUNK_ACCOUNT_PLACEHOLDER: &str = "<SPLUNK_ACCOUNT>";

/// Everything the two handlers need to know about their environment.
///
/// Built once at start-up and handed to each component, every field has a
/// default so an empty environment still yields a usable value.
#[derive(Clone, Debug)]
pub struct Settings {
    pub region: String,
    pub idp_entry_url: String,
    pub login_form_id: String,
    pub username_suffix: String,
    pub saml_provider_name: String,
    pub ssl_verification: bool,
    pub splunk_account: Option<String>,
    pub role_name: String,
    pub policy_name: String,
    pub bucket: String,
    pub policy_document: PathBuf,
    pub assume_role_document: PathBuf,
    pub staging_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: "eu-west-1".to_string(),
            idp_entry_url: "https://sts.global.client.org/adfs/ls/IdpInitiatedSignOn.aspx?loginToRp=urn:amazon:webservices".to_string(),
            login_form_id: "loginForm".to_string(),
            username_suffix: "@global.client.org".to_string(),
            saml_provider_name: "ClientADFS".to_string(),
            ssl_verification: true,
            splunk_account: None,
            role_name: "client-readsplunk-role".to_string(),
            policy_name: "client-splunk-read-all".to_string(),
            bucket: "client-roles-arns".to_string(),
            policy_document: PathBuf::from("policies/client-splunk-read.json"),
            assume_role_document: PathBuf::from("policies/assumepolicy.json"),
            staging_dir: std::env::temp_dir(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from any key lookup, blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let ssl_verification = match get("SSL_VERIFICATION") {
            Some(value) => parse_bool("SSL_VERIFICATION", &value)?,
            None => defaults.ssl_verification,
        };

        Ok(Self {
            region: get("AWS_REGION").unwrap_or(defaults.region),
            idp_entry_url: get("IDP_ENTRY_URL").unwrap_or(defaults.idp_entry_url),
            login_form_id: get("IDP_LOGIN_FORM_ID").unwrap_or(defaults.login_form_id),
            username_suffix: get("IDP_USERNAME_SUFFIX").unwrap_or(defaults.username_suffix),
            saml_provider_name: get("SAML_PROVIDER_NAME").unwrap_or(defaults.saml_provider_name),
            ssl_verification,
            splunk_account: get("SPLUNK_AWS_ACCOUNT"),
            role_name: get("ROLE_NAME").unwrap_or(defaults.role_name),
            policy_name: get("POLICY_NAME").unwrap_or(defaults.policy_name),
            bucket: get("S3_BUCKET").unwrap_or(defaults.bucket),
            policy_document: get("POLICY_DOCUMENT")
                .map(PathBuf::from)
                .unwrap_or(defaults.policy_document),
            assume_role_document: get("ASSUME_ROLE_DOCUMENT")
                .map(PathBuf::from)
                .unwrap_or(defaults.assume_role_document),
            staging_dir: get("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_dir),
        })
    }

    pub fn role_arn(&self, account_id: &str, role_name: &str) -> String {
        format!("arn:aws:iam::{}:role/{}", account_id, role_name)
    }

    pub fn principal_arn(&self, account_id: &str) -> String {
        format!(
            "arn:aws:iam::{}:saml-provider/{}",
            account_id, self.saml_provider_name
        )
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("{} must be true or false, got '{}'", key, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.role_name, "client-readsplunk-role");
        assert_eq!(settings.policy_name, "client-splunk-read-all");
        assert_eq!(settings.bucket, "client-roles-arns");
        assert_eq!(settings.login_form_id, "loginForm");
        assert!(settings.ssl_verification);
        assert!(settings.splunk_account.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = hashmap! {
            "SPLUNK_AWS_ACCOUNT" => "999988887777",
            "ROLE_NAME" => "other-role",
            "S3_BUCKET" => "other-bucket",
            "SSL_VERIFICATION" => "False",
            "AWS_REGION" => "us-east-1",
        };
        let settings = Settings::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.splunk_account.as_deref(), Some("999988887777"));
        assert_eq!(settings.role_name, "other-role");
        assert_eq!(settings.bucket, "other-bucket");
        assert!(!settings.ssl_verification);
        assert_eq!(settings.region, "us-east-1");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let settings = Settings::from_lookup(|key| match key {
            "S3_BUCKET" => Some("  ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.bucket, "client-roles-arns");
    }

    #[test]
    fn invalid_bool_is_rejected() {
        let result = Settings::from_lookup(|key| match key {
            "SSL_VERIFICATION" => Some("maybe".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn builds_arns_for_account() {
        let settings = Settings::default();
        assert_eq!(
            settings.role_arn("123456789012", "client-app-developer"),
            "arn:aws:iam::123456789012:role/client-app-developer"
        );
        assert_eq!(
            settings.principal_arn("123456789012"),
            "arn:aws:iam::123456789012:saml-provider/ClientADFS"
        );
    }
}
