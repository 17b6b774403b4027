use crate::error::{Result, SsoError};
use crate::helpers::scheme_and_host;
use scraper::node::Element;
use scraper::Html;
use url::Url;

/// Name of the hidden input the IdP posts the assertion back in.
pub const SAML_RESPONSE_INPUT: &str = "SAMLResponse";

/// Elements with the given tag name, in document order.
fn elements<'a>(document: &'a Html, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    document
        .root_element()
        .descendants()
        .filter_map(|node| node.value().as_element())
        .filter(move |element| element.name().eq_ignore_ascii_case(tag))
}

/// Works out where the IdP login form should be posted.
///
/// When a form with id `form_id` declares an action, the target is the entry
/// URL's scheme and host joined with that action; the last such form wins.
/// Otherwise the form is posted back to `final_url`, the page the entry URL
/// redirected to.
pub fn form_submit_url(html: &str, entry_url: &str, form_id: &str, final_url: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let mut submit_url = final_url.to_string();

    for form in elements(&document, "form") {
        match (form.attr("id"), form.attr("action")) {
            (Some(id), Some(action)) if id == form_id && !action.is_empty() => {
                let entry = Url::parse(entry_url)?;
                submit_url = format!("{}{}", scheme_and_host(&entry), action);
            }
            _ => {}
        }
    }

    Ok(submit_url)
}

/// Pulls the base64 SAML assertion out of the page returned after login.
pub fn saml_assertion(html: &str) -> Result<String> {
    let document = Html::parse_document(html);

    let assertion = elements(&document, "input")
        .find(|input| input.attr("name") == Some(SAML_RESPONSE_INPUT))
        .and_then(|input| input.attr("value"))
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    assertion.ok_or(SsoError::MissingAssertion)
}
