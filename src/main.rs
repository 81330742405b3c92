use std::sync::Arc;

mod app;
mod auth;
mod authz;
mod categories;
mod config;
mod db;
mod docs;
mod error;
mod links;
mod logging;
#[cfg(test)]
mod memory;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);
    logging::init(config.log_format);

    let db = db::connect(&config).await?;
    let state = AppState::init(config.clone(), db)?;

    app::serve(&config, app::build_app(state)).await
}
