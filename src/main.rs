use anyhow::Result;
use bear_facts_skill::config::Config;
use bear_facts_skill::server::{self, AppState};
use bear_facts_skill::skill::Skill;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bear_facts_skill=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting bear facts skill");

    // Load configuration from environment
    let config = Config::from_env()?;
    info!(
        "Default locale: {}, timestamp tolerance: {}s",
        config.default_locale, config.timestamp_tolerance_secs
    );

    // Content defects stop startup here rather than surfacing per request
    let skill = Skill::from_config(&config)?;
    let verifier = server::verifier_from_config(&config);

    let state = Arc::new(AppState::new(skill, verifier));
    server::serve(&config, state).await
}
