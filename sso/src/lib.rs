pub mod error;
pub mod helpers;
pub mod login_form;
pub mod saml_response;
pub mod sso;
pub mod sts;

pub use error::{Result, SsoError};
