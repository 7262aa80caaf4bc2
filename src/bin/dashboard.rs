//! Dashboard Binary
//!
//! Runs the terminal dashboard against a live ADX strategy bot.
//!
//! ## Setup
//!
//! 1. Optionally create a config file (TOML/JSON/YAML, `config` crate):
//!    ```toml
//!    [api]
//!    base_url = "http://localhost:5900"
//!
//!    [dashboard]
//!    refresh_secs = 5
//!    trade_filter = "paper"
//!    ```
//!
//! 2. Run the dashboard:
//!    ```bash
//!    cargo run --bin dashboard -- --config dashboard.toml
//!    ```
//!
//! Without a config file the defaults point at `http://localhost:5900`.
//! Settings can also be overridden via `ADX`-prefixed environment variables,
//! e.g. `ADX_API__BASE_URL=http://bot:5900`.

use std::env;

use log::{error, info, warn};

use adx_dashboard::{ApiClient, Refresher, Settings, TermSurface};

#[tokio::main]
async fn main() {
    // Load .env before settings so environment overrides apply
    let dotenv_path = dotenvy::dotenv().ok();

    // Parse arguments
    let args: Vec<String> = env::args().collect();
    let settings = if args.len() > 2 && args[1] == "--config" {
        match Settings::new(&args[2]) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                return;
            }
        }
    } else {
        Settings::default()
    };

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", &settings.log.level);
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Some(path) = dotenv_path {
        info!("Loaded environment from: {}", path.display());
    }

    info!("Starting ADX dashboard");
    info!("Bot API: {}", settings.api.base_url);
    info!(
        "Refresh every {}s, trade limit {}, filter {:?}",
        settings.dashboard.refresh_secs,
        settings.dashboard.trade_limit,
        settings.dashboard.trade_filter
    );

    let api = ApiClient::new(settings.api.base_url.clone());

    // One-shot health probe so a wrong base_url is obvious up front
    match api.health().await {
        Ok(health) => info!("Bot health: {} ({})", health.status, health.service),
        Err(e) => warn!("Health probe failed, continuing anyway: {e}"),
    }

    let surface =
        TermSurface::interactive().with_trade_filter(settings.dashboard.trade_filter.clone());
    let mut refresher = Refresher::new(api, surface, &settings.dashboard);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {e}");
        }
    };

    refresher.run(shutdown).await;
}
