use anyhow::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use sso::sts::TemporaryCredentials;

/// Field order matches the sorted key order of the printed object.
#[derive(Serialize)]
pub struct JsonCredential {
    #[serde(rename = "AccessKey")]
    pub access_key: String,
    #[serde(rename = "SecretKey")]
    pub secret_key: String,
    #[serde(rename = "SessionToken")]
    pub session_token: String,
}

impl JsonCredential {
    pub fn convert(credential: TemporaryCredentials) -> Self {
        Self {
            access_key: credential.access_key,
            secret_key: credential.secret_key,
            session_token: credential.session_token,
        }
    }

    /// Pretty JSON with a four space indent.
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
