use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use shared::args::{Args, Command};
use shared::events::read_event;
use shared::settings::Settings;
use std::fs::File;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod integrate;
mod json;
mod temp_keys;

/// Logs go to stderr, stdout only ever carries the handler's result.
fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},aws_config=warn,aws_smithy_http_tower=warn,hyper=warn", level))
    });

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .with_line_number(debug)
        .with_env_filter(filter)
        .init();
}

fn load_event<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Unable to open event file {}", path.display()))?;
            read_event(file)
        }
        None => read_event(std::io::stdin().lock()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.debug);

    let settings = Settings::from_env()?;
    let event_path = args.event.as_deref();

    debug!("Handling {:?} event", args.command);

    let output = match args.command {
        Command::TempKeys => temp_keys::run(load_event(event_path)?, &settings).await?,
        Command::Integrate => integrate::run(load_event(event_path)?, &settings).await?,
    };

    println!("{}", output);

    Ok(())
}
