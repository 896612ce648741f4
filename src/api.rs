use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

use crate::alert_log::AlertLog;
use crate::engine::membership::MembershipState;
use crate::engine::TradeAnalyzer;
use crate::events::{Alert, RawTrade};
use crate::feed::ReplayFeed;

/// Shared between the feed loop and the HTTP handlers. The mutex around the
/// analyzer is what keeps `analyze` calls one at a time.
pub struct AppState {
    pub analyzer: Mutex<TradeAnalyzer>,
    pub membership: MembershipState,
    pub log: AlertLog,
}

impl AppState {
    pub fn new(analyzer: TradeAnalyzer, membership: MembershipState, log: AlertLog) -> Self {
        Self {
            analyzer: Mutex::new(analyzer),
            membership,
            log,
        }
    }

    /// Runs one batch and records the resulting alerts. The analyzer guard
    /// is held until the log is written so a reset never lands in between.
    pub fn ingest(&self, batch: &[RawTrade]) -> Vec<Alert> {
        let mut analyzer = self.analyzer.lock().unwrap_or_else(PoisonError::into_inner);
        let alerts = analyzer.analyze(batch, &self.membership);
        self.log.record(&alerts);
        alerts
    }

    pub fn reset(&self) {
        let mut analyzer = self.analyzer.lock().unwrap_or_else(PoisonError::into_inner);
        analyzer.reset();
        self.log.clear();
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/alerts", get(get_alerts))
        .route("/alerts.csv", get(get_alerts_csv))
        .route("/summary", get(get_summary))
        .route("/reset", post(reset))
        .with_state(state)
}

pub async fn run_server(state: Arc<AppState>, bind_addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("API Server listening on {}", bind_addr);
    axum::serve(listener, router(state)).await
}

/// Feeds one replay batch per tick into `state`, echoing every alert to the
/// log. File reads run on the blocking pool. Returns the number of alerts.
pub async fn run_replay(mut feed: ReplayFeed, state: Arc<AppState>, every: Duration) -> usize {
    let mut ticker = tokio::time::interval(every);
    let mut emitted = 0;

    loop {
        let read = tokio::task::spawn_blocking(move || {
            let batch = feed.next();
            (batch, feed)
        })
        .await;
        let batch = match read {
            Ok((Some(batch), rest)) => {
                feed = rest;
                batch
            }
            Ok((None, _)) => break,
            Err(e) => {
                warn!("Replay reader stopped: {}", e);
                break;
            }
        };

        ticker.tick().await;
        if batch.is_empty() {
            continue;
        }
        for alert in state.ingest(&batch) {
            info!("{}", alert);
            emitted += 1;
        }
    }

    info!("Replay finished, {} alerts", emitted);
    emitted
}

#[derive(serde::Deserialize)]
struct AlertParams {
    limit: Option<usize>,
}

async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AlertParams>,
) -> impl IntoResponse {
    Json(state.log.recent(params.limit))
}

async fn get_alerts_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"alerts.csv\""),
        ],
        state.log.to_csv(),
    )
}

async fn get_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.log.summary())
}

async fn reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.reset();
    info!("Analyzer and alert log reset via API");
    Json(json!({"status": "reset"}))
}
