//! Last-known-good display state.

use crate::progress::WinRateSeries;
use crate::snapshot::{GameHistoryEntry, LiveStatusSnapshot, MetricsSnapshot};
use crate::ui_model::{Controls, StatusLine};

/// What the client currently shows. One instance per monitor, alive for the
/// whole process.
///
/// The polling path only ever swaps this out wholesale for the output of
/// [`crate::reconcile`] or [`crate::progress::apply_progress`]. A failed fetch
/// never reaches it. The session controller is the one other writer and only
/// touches the status line, the controls and the opponent warning.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Last reconciled live snapshot; `None` until the first successful poll.
    pub live: Option<LiveStatusSnapshot>,
    pub metrics: Option<MetricsSnapshot>,
    pub history: Vec<GameHistoryEntry>,
    pub training_active: bool,
    pub status: StatusLine,
    pub controls: Controls,
    /// Position currently on the board widget, if any was ever drawn.
    pub board: Option<String>,
    /// Sticky: once set it stays set.
    pub opponent_warning: bool,
    pub trend: WinRateSeries,
}

impl ViewState {
    /// True until the first live snapshot has been applied.
    pub fn is_unsynced(&self) -> bool {
        self.live.is_none()
    }
}
