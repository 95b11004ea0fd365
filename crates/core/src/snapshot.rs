//! Server-reported state, as the rest of the crate sees it.
//!
//! These are the parsed domain types. The JSON shapes the server actually
//! sends live in [`crate::api`] and are mapped into these on receipt.

use serde::{Deserialize, Serialize};

/// Board position value the server uses before the first move is known.
pub const START_POSITION: &str = "start";

/// Result of one finished game, from the learning agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "q_learning")]
    SelfWin,
    #[serde(rename = "stockfish")]
    OpponentWin,
    #[serde(rename = "draw")]
    Draw,
}

/// The in-progress game plus the run-level activity flags.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStatusSnapshot {
    pub active: bool,
    pub status_text: String,
    /// FEN, the `"start"` sentinel, or nothing.
    pub current_position: Option<String>,
    pub move_log: Vec<String>,
    pub game_number: Option<u32>,
    pub opponent_available: bool,
}

impl LiveStatusSnapshot {
    /// Position worth drawing. Absent, empty and sentinel positions yield `None`.
    pub fn drawable_position(&self) -> Option<&str> {
        self.current_position
            .as_deref()
            .filter(|p| !p.is_empty() && *p != START_POSITION)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub total_games: u64,
    pub wins_self: u64,
    pub wins_opponent: u64,
    pub draws: u64,
    pub win_rate_pct: f64,
    pub avg_moves: f64,
    pub exploration_rate: f64,
    pub states_learned: u64,
}

/// One finished game as listed in the recent-games panel.
#[derive(Debug, Clone, PartialEq)]
pub struct GameHistoryEntry {
    pub game_number: u32,
    pub outcome: Outcome,
    pub move_count: u32,
    pub exploration_rate_at_time: f64,
}

/// Unit folded by the progress aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProgressPoint {
    pub game_number: u32,
    #[serde(rename = "winner")]
    pub outcome: Outcome,
}

/// Everything one live-status poll returns. Only ever built from a complete,
/// successfully parsed response.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub live: LiveStatusSnapshot,
    pub metrics: MetricsSnapshot,
    pub history: Vec<GameHistoryEntry>,
}
