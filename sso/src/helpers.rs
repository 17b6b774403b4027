use crate::error::Result;
use base64::engine::general_purpose;
use base64::Engine;
use url::Url;

pub fn base64_decode_to_string(string: &str) -> Result<String> {
    let output_vec = general_purpose::STANDARD.decode(string.trim())?;
    Ok(String::from_utf8(output_vec)?)
}

/// `scheme://host[:port]` of a URL, without path or query.
pub fn scheme_and_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}
