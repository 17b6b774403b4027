pub mod aws;
pub mod bootstrap;
pub mod documents;
pub mod error;
pub mod integrate;
pub mod publisher;

pub use error::{IntegrationError, ProviderFault, Result};
