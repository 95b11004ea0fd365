//! The four server endpoints, behind the [`TrainingApi`] seam.
//!
//! Each call is exactly one round trip with no retry; the polling timers are
//! the retry. Reads parse the full body before anything is returned, so a
//! response missing a required field is an error, never a partial snapshot.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MonitorConfig;
use crate::error::{CommandError, FetchError};
use crate::http::check_response;
use crate::snapshot::{
    GameHistoryEntry, LiveStatusSnapshot, MetricsSnapshot, Outcome, ProgressPoint, StatusReport,
};

const STATUS_PATH: &str = "/api/training_status";
const PROGRESS_PATH: &str = "/api/agent_progress";
const START_PATH: &str = "/api/start_training";
const STOP_PATH: &str = "/api/stop_training";

/// Server's answer to an accepted start command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartAccepted {
    pub message: String,
    /// `false` when the server said so or did not say at all.
    pub opponent_available: bool,
}

/// Read and control access to the training server.
///
/// Futures are not required to be `Send`; the monitor drives them on a
/// single thread.
#[allow(async_fn_in_trait)]
pub trait TrainingApi {
    async fn fetch_live_status(&self) -> Result<StatusReport, FetchError>;

    async fn fetch_progress_history(&self) -> Result<Vec<ProgressPoint>, FetchError>;

    async fn start_training(&self, num_games: u32) -> Result<StartAccepted, CommandError>;

    async fn stop_training(&self) -> Result<(), CommandError>;
}

// ═══════════════════════════════════════════════════════════════════════════
// Wire shapes
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct WireStatus {
    training_active: bool,
    live_game: WireLiveGame,
    metrics: WireMetrics,
    recent_games: Vec<WireGame>,
    stockfish_available: bool,
}

#[derive(Debug, Deserialize)]
struct WireLiveGame {
    status: String,
    #[serde(default)]
    current_fen: Option<String>,
    moves: Vec<String>,
    #[serde(default)]
    game_number: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireMetrics {
    total_games: u64,
    q_learning_wins: u64,
    stockfish_wins: u64,
    draws: u64,
    win_rate: f64,
    avg_moves: f64,
    exploration_rate: f64,
    states_learned: u64,
}

#[derive(Debug, Deserialize)]
struct WireGame {
    game_number: u32,
    winner: Outcome,
    moves: u32,
    exploration_rate: f64,
}

#[derive(Debug, Deserialize)]
struct WireProgress {
    progress: Vec<ProgressPoint>,
}

#[derive(Debug, Serialize)]
struct WireStartRequest {
    num_games: u32,
}

#[derive(Debug, Deserialize)]
struct WireStartResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    stockfish_available: Option<bool>,
}

impl From<WireStatus> for StatusReport {
    fn from(w: WireStatus) -> Self {
        StatusReport {
            live: LiveStatusSnapshot {
                active: w.training_active,
                status_text: w.live_game.status,
                current_position: w.live_game.current_fen,
                move_log: w.live_game.moves,
                game_number: w.live_game.game_number,
                opponent_available: w.stockfish_available,
            },
            metrics: MetricsSnapshot {
                total_games: w.metrics.total_games,
                wins_self: w.metrics.q_learning_wins,
                wins_opponent: w.metrics.stockfish_wins,
                draws: w.metrics.draws,
                win_rate_pct: w.metrics.win_rate,
                avg_moves: w.metrics.avg_moves,
                exploration_rate: w.metrics.exploration_rate,
                states_learned: w.metrics.states_learned,
            },
            history: w
                .recent_games
                .into_iter()
                .map(|g| GameHistoryEntry {
                    game_number: g.game_number,
                    outcome: g.winner,
                    move_count: g.moves,
                    exploration_rate_at_time: g.exploration_rate,
                })
                .collect(),
        }
    }
}

pub(crate) fn parse_status_report(body: &str) -> Result<StatusReport, serde_json::Error> {
    serde_json::from_str::<WireStatus>(body).map(StatusReport::from)
}

pub(crate) fn parse_progress(body: &str) -> Result<Vec<ProgressPoint>, serde_json::Error> {
    serde_json::from_str::<WireProgress>(body).map(|w| w.progress)
}

/// Interpret a start response. An `error` field wins over the status code;
/// an unreadable body on a failed status is still a rejection.
pub(crate) fn interpret_start(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<StartAccepted, CommandError> {
    let parsed: WireStartResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !status.is_success() => {
            return Err(CommandError::Rejected(format!("server returned {status}")));
        }
        Err(e) => return Err(FetchError::from(e).into()),
    };
    if let Some(error) = parsed.error {
        return Err(CommandError::Rejected(error));
    }
    if !status.is_success() {
        return Err(CommandError::Rejected(format!("server returned {status}")));
    }
    Ok(StartAccepted {
        message: parsed.message.unwrap_or_default(),
        opponent_available: parsed.stockfish_available.unwrap_or(false),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// HTTP client
// ═══════════════════════════════════════════════════════════════════════════

/// [`TrainingApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpTrainingApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTrainingApi {
    /// Build a client for `config.server_url`.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &MonitorConfig) -> Self {
        let mut builder = reqwest::Client::builder().user_agent("rookwatch/0.1");
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self {
            http: builder.build().expect("reqwest client should build"),
            base_url: config.server_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_body(&self, path: &str) -> Result<String, FetchError> {
        let resp = check_response(self.http.get(self.endpoint(path)).send().await?).await?;
        Ok(resp.text().await?)
    }
}

impl TrainingApi for HttpTrainingApi {
    async fn fetch_live_status(&self) -> Result<StatusReport, FetchError> {
        let body = self.get_body(STATUS_PATH).await?;
        Ok(parse_status_report(&body)?)
    }

    async fn fetch_progress_history(&self) -> Result<Vec<ProgressPoint>, FetchError> {
        let body = self.get_body(PROGRESS_PATH).await?;
        Ok(parse_progress(&body)?)
    }

    async fn start_training(&self, num_games: u32) -> Result<StartAccepted, CommandError> {
        let resp = self
            .http
            .post(self.endpoint(START_PATH))
            .json(&WireStartRequest { num_games })
            .send()
            .await
            .map_err(FetchError::from)?;
        let status = resp.status();
        let body = resp.text().await.map_err(FetchError::from)?;
        debug!(%status, "start response received");
        interpret_start(status, &body)
    }

    async fn stop_training(&self) -> Result<(), CommandError> {
        let resp = self
            .http
            .get(self.endpoint(STOP_PATH))
            .send()
            .await
            .map_err(FetchError::from)?;
        debug!(status = %resp.status(), "stop response received");
        Ok(())
    }
}
