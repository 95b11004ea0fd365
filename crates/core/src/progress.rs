//! Cumulative win-rate trend over the full game history.
//!
//! Recomputed from scratch on every progress poll. No state carries between
//! polls, so missed polls or a rewritten history cannot leave the trend out
//! of step with the server.

use crate::reconcile::Reconciliation;
use crate::render::Redraw;
use crate::snapshot::{Outcome, ProgressPoint};
use crate::view::ViewState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinRatePoint {
    pub game_number: u32,
    /// Share of self wins among games `0..=i`, in percent.
    pub win_rate_pct: f64,
}

impl WinRatePoint {
    /// X-axis label.
    pub fn label(&self) -> String {
        format!("Game {}", self.game_number)
    }

    /// Percentage rounded to two decimals.
    pub fn rounded_pct(&self) -> f64 {
        (self.win_rate_pct * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WinRateSeries {
    points: Vec<WinRatePoint>,
}

impl WinRateSeries {
    pub fn points(&self) -> &[WinRatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&WinRatePoint> {
        self.points.last()
    }

    /// Keep only the most recent `window` points. Values are not recomputed.
    pub fn tail(mut self, window: usize) -> Self {
        if self.points.len() > window {
            self.points = self.points.split_off(self.points.len() - window);
        }
        self
    }
}

/// Fold the history into a running win rate. Index order defines the x-axis;
/// game numbers are carried through as labels only.
pub fn aggregate(points: &[ProgressPoint]) -> WinRateSeries {
    let mut wins = 0u32;
    let points = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if p.outcome == Outcome::SelfWin {
                wins += 1;
            }
            WinRatePoint {
                game_number: p.game_number,
                win_rate_pct: f64::from(wins) / (i + 1) as f64 * 100.0,
            }
        })
        .collect();
    WinRateSeries { points }
}

/// Apply a progress snapshot to the view.
///
/// An empty history leaves the trend as it was. The series is always built
/// over the whole history; `window` only limits what gets drawn.
pub fn apply_progress(
    previous: &ViewState,
    points: &[ProgressPoint],
    window: Option<usize>,
) -> Reconciliation {
    let mut state = previous.clone();
    let mut redraws = Vec::new();

    if !points.is_empty() {
        let mut series = aggregate(points);
        if let Some(window) = window {
            series = series.tail(window);
        }
        if series != previous.trend {
            redraws.push(Redraw::Trend(series.clone()));
            state.trend = series;
        }
    }

    Reconciliation { state, redraws }
}
