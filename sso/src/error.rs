use thiserror::Error;

pub type Result<T, E = SsoError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SsoError {
    #[error("Response did not contain a valid SAML assertion. Check if payload contains correct details")]
    MissingAssertion,

    #[error("There are no roles available for the user to assume")]
    NoRolesAvailable,

    #[error("There was an issue with the role or account provided")]
    InvalidRole,

    #[error("The role '{0}' is not a valid role")]
    InvalidRequestedRole(String),

    #[error("Malformed role data: '{0}'")]
    MalformedRole(String),

    #[error("Credential exchange failed: {0}")]
    CredentialExchange(String),

    #[error("SAML assertion is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("SAML assertion is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("SAML assertion could not be parsed: {0}")]
    Xml(#[from] serde_xml_rs::Error),

    #[error("IdP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid IdP URL: {0}")]
    Url(#[from] url::ParseError),
}
