use crate::error::{Result, SsoError};
use crate::login_form::{form_submit_url, saml_assertion};
use crate::saml_response::{parse_roles_from_saml_response, select_role};
use crate::sts::{SamlFederation, TemporaryCredentials};
use maplit::hashmap;
use shared::events::{TempKeysEvent, VALID_ROLES};
use shared::settings::Settings;
use tracing::{debug, error, info};

/// Logs in to the IdP and exchanges the resulting assertion for temporary keys.
pub async fn request_temp_keys(
    event: TempKeysEvent,
    settings: &Settings,
    federation: &dyn SamlFederation,
) -> Result<TemporaryCredentials> {
    let client = login_client_builder(settings).build()?;
    request_temp_keys_with_client(&client, event, settings, federation).await
}

/// HTTP client settings for the IdP session: cookies kept across the form
/// fetch and the submit, certificate checks per `SSL_VERIFICATION`.
pub fn login_client_builder(settings: &Settings) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .cookie_store(true)
        .danger_accept_invalid_certs(!settings.ssl_verification)
}

pub async fn request_temp_keys_with_client(
    client: &reqwest::Client,
    event: TempKeysEvent,
    settings: &Settings,
    federation: &dyn SamlFederation,
) -> Result<TemporaryCredentials> {
    let TempKeysEvent {
        username,
        password,
        role,
        account_id,
    } = event;

    if !VALID_ROLES.contains(&role.as_str()) {
        error!("The role '{}' is not a valid role", role);
        return Err(SsoError::InvalidRequestedRole(role));
    }

    let username = format!("{}{}", username, settings.username_suffix);

    info!("Logging into the IdP as {}", username);

    let response = perform_login(client, settings, &username, password).await?;

    generate_temp_keys(&response, &role, &account_id, settings, federation).await
}

/// Posts the user's credentials to the IdP login form and returns the page
/// that carries the SAML assertion.
pub async fn perform_login(
    client: &reqwest::Client,
    settings: &Settings,
    username: &str,
    password: String,
) -> Result<String> {
    debug!("Fetching login form from {}", settings.idp_entry_url);
    let form_response = client.get(&settings.idp_entry_url).send().await?;
    let final_url = form_response.url().to_string();
    let form_html = form_response.text().await?;

    let submit_url = form_submit_url(
        &form_html,
        &settings.idp_entry_url,
        &settings.login_form_id,
        &final_url,
    )?;

    let payload = hashmap! {
        "UserName" => username,
        "Password" => password.as_str(),
        "Kmsi" => "true",
        "AuthMethod" => "",
    };

    debug!("Submitting login form to {}", submit_url);
    let request = client.post(&submit_url).form(&payload).build()?;
    drop(payload);
    drop(password);

    let response = client.execute(request).await?;

    Ok(response.text().await?)
}

/// Validates the requested role against the assertion in `response` and
/// trades the assertion for keys.
pub async fn generate_temp_keys(
    response: &str,
    role: &str,
    account_id: &str,
    settings: &Settings,
    federation: &dyn SamlFederation,
) -> Result<TemporaryCredentials> {
    let assertion = saml_assertion(response)?;
    let roles = parse_roles_from_saml_response(&assertion)?;

    let selected_role = select_role(
        &roles,
        &settings.role_arn(account_id, role),
        &settings.principal_arn(account_id),
    )?;

    info!("The Role {} and Account {} provided are valid", selected_role.role_arn, account_id);

    federation
        .assume_role_with_saml(&selected_role, &assertion)
        .await
}
