use anyhow::Result;
use integration::aws::{delegated_config, own_config};
use integration::bootstrap::IamClient;
use integration::integrate::integrate_account;
use integration::publisher::S3Store;
use shared::events::IntegrateEvent;
use shared::settings::Settings;

pub async fn run(event: IntegrateEvent, settings: &Settings) -> Result<String> {
    // IAM acts with the event's keys, the record is written as ourselves.
    let iam = IamClient::new(&delegated_config(&event, &settings.region).await);
    let store = S3Store::new(&own_config().await);

    Ok(integrate_account(&event.account_id, settings, &iam, &store).await?)
}
