//! SK list-management console: lists, audits and acts on one record collection.

#![forbid(unsafe_code)]

mod commands;
mod console_config;
mod render;

use std::env;
use std::time::Duration;

use skmis_core::AppError;
use skmis_domain::{
    Announcement, Award, DirectoryEntry, DocumentTemplate, SkOfficial, YouthProfile,
};
use tracing::info;

use commands::{Command, run};
use console_config::{ConsoleConfig, ResourceKind, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        api_base_url = %config.api_base_url,
        resource = %config.resource,
        role = config.current_user.role().as_str(),
        items_per_page = config.items_per_page,
        "skmis-console started"
    );

    match config.resource {
        ResourceKind::Announcements => run::<Announcement>(&config, http_client, command).await,
        ResourceKind::Awards => run::<Award>(&config, http_client, command).await,
        ResourceKind::Directory => run::<DirectoryEntry>(&config, http_client, command).await,
        ResourceKind::Profiles => run::<YouthProfile>(&config, http_client, command).await,
        ResourceKind::SkOfficials => run::<SkOfficial>(&config, http_client, command).await,
        ResourceKind::Templates => run::<DocumentTemplate>(&config, http_client, command).await,
    }
}
