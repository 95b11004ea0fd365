//! Display vocabulary shared by the reconciler, the session controller and
//! whatever renders their output.
//!
//! Keeping labels here (not in a frontend) lets the host unit-test exactly
//! what text a given state produces.

use crate::snapshot::Outcome;

pub const SELF_LABEL: &str = "Q-Learning (White)";
pub const OPPONENT_LABEL: &str = "Stockfish (Black)";
/// Opponent identity shown once the engine is reported missing.
pub const OPPONENT_FALLBACK_LABEL: &str = "Random (Black)";

pub const READY_TEXT: &str = "Ready to start training";
pub const STARTING_TEXT: &str = "Starting training session...";
pub const COMPLETED_TEXT: &str = "Training completed";
pub const STOPPED_TEXT: &str = "Training stopped by user";
pub const DEFAULT_STARTED_TEXT: &str = "Training started";

pub const NO_MOVES_PLACEHOLDER: &str = "No moves yet...";
pub const NO_GAMES_PLACEHOLDER: &str = "No games played yet...";
pub const NO_GAME_NUMBER: &str = "-";

/// Substrings that mark a status text as describing a run that has not ended.
const RUNNING_MARKERS: [&str; 2] = ["Starting", "In progress"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTag {
    Active,
    #[default]
    Inactive,
}

impl StatusTag {
    /// Style class for the banner.
    pub fn class(self) -> &'static str {
        match self {
            StatusTag::Active => "status-active",
            StatusTag::Inactive => "status-inactive",
        }
    }

    pub fn for_activity(active: bool) -> Self {
        if active {
            StatusTag::Active
        } else {
            StatusTag::Inactive
        }
    }
}

/// The status banner: text plus style tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tag: StatusTag,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, tag: StatusTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }

    /// True if the text describes a starting or in-progress run.
    pub fn indicates_running(&self) -> bool {
        text_indicates_running(&self.text)
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(READY_TEXT, StatusTag::Inactive)
    }
}

pub(crate) fn text_indicates_running(text: &str) -> bool {
    RUNNING_MARKERS.iter().any(|m| text.contains(m))
}

/// Enablement of the start/stop pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Controls {
    /// Nothing running: start enabled, stop disabled.
    pub const IDLE: Controls = Controls {
        start_enabled: true,
        stop_enabled: false,
    };

    /// Run in progress: start disabled, stop enabled.
    pub const RUNNING: Controls = Controls {
        start_enabled: false,
        stop_enabled: true,
    };

    pub fn for_activity(active: bool) -> Self {
        if active {
            Controls::RUNNING
        } else {
            Controls::IDLE
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Controls::IDLE
    }
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::SelfWin => "Q-Learning Won",
            Outcome::OpponentWin => "Stockfish Won",
            Outcome::Draw => "Draw",
        }
    }

    pub fn all() -> &'static [Outcome] {
        &[Outcome::SelfWin, Outcome::OpponentWin, Outcome::Draw]
    }
}
