use crate::json::JsonCredential;
use anyhow::Result;
use shared::events::TempKeysEvent;
use shared::settings::Settings;
use sso::sts::StsFederation;

pub async fn run(event: TempKeysEvent, settings: &Settings) -> Result<String> {
    let federation = StsFederation::new(&settings.region).await;
    let credentials = sso::sso::request_temp_keys(event, settings, &federation).await?;

    JsonCredential::convert(credentials).to_json()
}
