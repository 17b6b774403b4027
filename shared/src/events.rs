use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::io::Read;

/// Roles a caller may request temporary keys for.
pub const VALID_ROLES: [&str; 4] = [
    "client-app-tester",
    "client-app-productowner",
    "client-app-developer",
    "client-app-admin",
];

#[derive(Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct TempKeysEvent {
    pub username: String,
    pub password: String,
    pub role: String,
    #[serde(rename = "AccountID")]
    pub account_id: String,
}

impl Debug for TempKeysEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempKeysEvent")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct IntegrateEvent {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: String,
    #[serde(rename = "AccountID")]
    pub account_id: String,
}

impl Debug for IntegrateEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrateEvent")
            .field("access_key", &self.access_key)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

pub fn read_event<T, R>(reader: R) -> Result<T>
where
    T: DeserializeOwned,
    R: Read,
{
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_temp_keys_event() {
        let json = r#"{"Username": "alice", "Password": "p", "Role": "client-app-developer", "AccountID": "123456789012"}"#;
        let event: TempKeysEvent = read_event(json.as_bytes()).unwrap();
        assert_eq!(event.username, "alice");
        assert_eq!(event.password, "p");
        assert_eq!(event.role, "client-app-developer");
        assert_eq!(event.account_id, "123456789012");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let json = r#"{"AccessKey": "AKIA", "SecretKey": "s3cr3t", "SessionToken": "t0k3n", "AccountID": "111122223333"}"#;
        let event: IntegrateEvent = read_event(json.as_bytes()).unwrap();
        let debug = format!("{:?}", event);
        assert!(debug.contains("111122223333"));
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("t0k3n"));
    }

    #[test]
    fn missing_field_is_an_error() {
        let json = r#"{"Username": "alice", "Role": "client-app-developer", "AccountID": "1"}"#;
        assert!(read_event::<TempKeysEvent, _>(json.as_bytes()).is_err());
    }
}
