use burst_radar::api::{run_replay, run_server, AppState};
use burst_radar::config::AppConfig;
use burst_radar::engine::membership::MembershipState;
use burst_radar::engine::TradeAnalyzer;
use burst_radar::feed::ReplayFeed;
use burst_radar::watchlist::load_membership;
use burst_radar::AlertLog;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // .env may carry BURST_CONFIG and RUST_LOG
    let _ = dotenvy::dotenv();

    // Setup Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Burst Radar...");

    let config = AppConfig::load()?;
    info!("Loaded Configuration: {:?}", config);

    let membership = match load_membership(&config.watchlist) {
        Ok(m) => m,
        Err(e) => {
            warn!("Watchlist load failed ({}), analysing every symbol", e);
            MembershipState::default()
        }
    };

    let analyzer = TradeAnalyzer::new(config.engine.clone());
    let log = AlertLog::new(config.server.alert_history_limit);
    let state = Arc::new(AppState::new(analyzer, membership, log));

    match &config.feed.replay_path {
        Some(path) => {
            let feed = ReplayFeed::open(path)?;
            info!(
                "Replaying {} every {}ms",
                feed.path().display(),
                config.feed.poll_interval_ms
            );
            tokio::spawn(run_replay(
                feed,
                state.clone(),
                Duration::from_millis(config.feed.poll_interval_ms),
            ));
        }
        None => info!("No feed.replay_path configured - serving queries only"),
    }

    run_server(state, &config.server.bind_addr).await?;
    Ok(())
}
