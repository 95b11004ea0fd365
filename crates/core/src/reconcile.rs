//! Live-status reconciliation: previous view + incoming snapshot → next view
//! and the set of regions to repaint.

use crate::render::Redraw;
use crate::snapshot::{GameHistoryEntry, StatusReport};
use crate::ui_model::{
    text_indicates_running, Controls, StatusLine, StatusTag, COMPLETED_TEXT, NO_GAMES_PLACEHOLDER,
    NO_GAME_NUMBER, NO_MOVES_PLACEHOLDER, OPPONENT_FALLBACK_LABEL,
};
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: ViewState,
    pub redraws: Vec<Redraw>,
}

/// Fold one live-status report into the view.
///
/// Pure: the same `previous` and `incoming` always give the same result.
/// Regions whose content did not change produce no redraw, so applying a
/// report twice repaints nothing the second time. On the first report every
/// region is drawn once.
pub fn reconcile(previous: &ViewState, incoming: StatusReport) -> Reconciliation {
    let StatusReport {
        live,
        metrics,
        history,
    } = incoming;
    let first = previous.is_unsynced();
    let prev_live = previous.live.as_ref();
    let mut redraws = Vec::new();

    let status = next_status(&previous.status, live.active, &live.status_text);
    if first || status != previous.status {
        redraws.push(Redraw::Status(status.clone()));
    }

    // Server activity always wins over any optimistic local arrangement.
    let controls = Controls::for_activity(live.active);
    if first || controls != previous.controls {
        redraws.push(Redraw::Controls(controls));
    }

    let board = match live.drawable_position() {
        Some(pos) if previous.board.as_deref() != Some(pos) => {
            redraws.push(Redraw::Board(pos.to_string()));
            Some(pos.to_string())
        }
        _ => previous.board.clone(),
    };

    if first || prev_live.map(|p| &p.move_log) != Some(&live.move_log) {
        redraws.push(Redraw::MoveLog(move_log_lines(&live.move_log)));
    }

    if first || prev_live.map(|p| p.game_number) != Some(live.game_number) {
        let label = live
            .game_number
            .map_or_else(|| NO_GAME_NUMBER.to_string(), |n| n.to_string());
        redraws.push(Redraw::CurrentGame(label));
    }

    if previous.metrics.as_ref() != Some(&metrics) {
        redraws.push(Redraw::Metrics(metrics.clone()));
    }

    if first || previous.history != history {
        redraws.push(Redraw::History(history_rows(&history)));
    }

    let opponent_warning = previous.opponent_warning || !live.opponent_available;
    if opponent_warning && !previous.opponent_warning {
        redraws.push(Redraw::OpponentWarning {
            opponent_label: OPPONENT_FALLBACK_LABEL,
        });
    }

    let state = ViewState {
        training_active: live.active,
        live: Some(live),
        metrics: Some(metrics),
        history,
        status,
        controls,
        board,
        opponent_warning,
        trend: previous.trend.clone(),
    };

    Reconciliation { state, redraws }
}

/// Banner for the next frame.
///
/// While inactive, a banner that still reads as starting/in progress is
/// replaced by the completed message so the display cannot stick on a stale
/// "Starting...". Once completed is shown, a stale running text from the
/// server keeps it there instead of flipping back.
fn next_status(shown: &StatusLine, active: bool, server_text: &str) -> StatusLine {
    if active {
        return StatusLine::new(server_text, StatusTag::Active);
    }
    let holding_completed = shown.text == COMPLETED_TEXT && text_indicates_running(server_text);
    if shown.indicates_running() || holding_completed {
        StatusLine::new(COMPLETED_TEXT, StatusTag::Inactive)
    } else {
        StatusLine::new(server_text, StatusTag::Inactive)
    }
}

fn move_log_lines(moves: &[String]) -> Vec<String> {
    if moves.is_empty() {
        vec![NO_MOVES_PLACEHOLDER.to_string()]
    } else {
        moves.to_vec()
    }
}

pub fn history_row(entry: &GameHistoryEntry) -> String {
    format!(
        "Game {} | {} | {} moves | Exploration: {}",
        entry.game_number,
        entry.outcome.label(),
        entry.move_count,
        entry.exploration_rate_at_time
    )
}

fn history_rows(history: &[GameHistoryEntry]) -> Vec<String> {
    if history.is_empty() {
        vec![NO_GAMES_PLACEHOLDER.to_string()]
    } else {
        history.iter().map(history_row).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::snapshot::{LiveStatusSnapshot, MetricsSnapshot, Outcome};
    use crate::ui_model::{STARTING_TEXT, STOPPED_TEXT};
    use pretty_assertions::assert_eq;

    pub(crate) fn metrics(total_games: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            total_games,
            wins_self: total_games / 2,
            wins_opponent: total_games - total_games / 2,
            draws: 0,
            win_rate_pct: 50.0,
            avg_moves: 42.5,
            exploration_rate: 0.3,
            states_learned: 120,
        }
    }

    pub(crate) fn report(active: bool, status: &str) -> StatusReport {
        StatusReport {
            live: LiveStatusSnapshot {
                active,
                status_text: status.to_string(),
                current_position: Some("start".to_string()),
                move_log: Vec::new(),
                game_number: None,
                opponent_available: true,
            },
            metrics: metrics(0),
            history: Vec::new(),
        }
    }

    fn apply(view: &ViewState, r: StatusReport) -> ViewState {
        reconcile(view, r).state
    }

    #[test]
    fn first_report_draws_every_region() {
        let out = reconcile(&ViewState::default(), report(false, "Idle"));
        assert_eq!(
            out.redraws,
            vec![
                Redraw::Status(StatusLine::new("Idle", StatusTag::Inactive)),
                Redraw::Controls(Controls::IDLE),
                Redraw::MoveLog(vec![NO_MOVES_PLACEHOLDER.to_string()]),
                Redraw::CurrentGame("-".to_string()),
                Redraw::Metrics(metrics(0)),
                Redraw::History(vec![NO_GAMES_PLACEHOLDER.to_string()]),
            ]
        );
        assert!(!out.state.is_unsynced());
    }

    #[test]
    fn same_report_twice_is_pure_and_quiet() {
        let mut r = report(true, "In progress - Game 1");
        r.live.current_position = Some("8/8/8/8/8/8/8/K6k w - - 0 1".to_string());
        r.live.move_log = vec!["e2e4".to_string()];

        let view = ViewState::default();
        let a = reconcile(&view, r.clone());
        let b = reconcile(&view, r.clone());
        assert_eq!(a, b);

        let again = reconcile(&a.state, r);
        assert!(again.redraws.is_empty());
        assert_eq!(again.state, a.state);
    }

    #[test]
    fn stale_starting_text_becomes_completed() {
        let view = apply(&ViewState::default(), report(true, "In progress - Game 3"));
        let out = reconcile(&view, report(false, "Starting training…"));
        assert_eq!(
            out.state.status,
            StatusLine::new(COMPLETED_TEXT, StatusTag::Inactive)
        );

        // Stays completed on the following poll instead of flipping back.
        let next = reconcile(&out.state, report(false, "Starting training…"));
        assert_eq!(next.state.status.text, COMPLETED_TEXT);
        assert!(next.redraws.is_empty());
    }

    #[test]
    fn first_inactive_report_shows_server_text_verbatim() {
        let out = reconcile(&ViewState::default(), report(false, "Starting training..."));
        assert_eq!(
            out.state.status,
            StatusLine::new("Starting training...", StatusTag::Inactive)
        );
    }

    #[test]
    fn locally_shown_starting_text_completes_when_server_is_idle() {
        let mut view = apply(&ViewState::default(), report(false, "Idle"));
        view.status = StatusLine::new(STARTING_TEXT, StatusTag::Active);
        view.controls = Controls::RUNNING;

        let out = reconcile(&view, report(false, "Idle"));
        assert_eq!(out.state.status.text, COMPLETED_TEXT);
        assert_eq!(out.state.controls, Controls::IDLE);
    }

    #[test]
    fn inactive_non_running_text_is_verbatim() {
        let mut view = apply(&ViewState::default(), report(false, "Idle"));
        view.status = StatusLine::new(STOPPED_TEXT, StatusTag::Inactive);
        let out = reconcile(&view, report(false, "Waiting for commands"));
        assert_eq!(out.state.status.text, "Waiting for commands");
    }

    #[test]
    fn server_activity_overrides_local_controls() {
        let mut view = apply(&ViewState::default(), report(false, "Idle"));
        view.controls = Controls::IDLE;
        let out = reconcile(&view, report(true, "In progress"));
        assert_eq!(out.state.controls, Controls::RUNNING);
        assert!(out.state.training_active);
        assert!(out.redraws.contains(&Redraw::Controls(Controls::RUNNING)));
    }

    #[test]
    fn sentinel_or_absent_position_keeps_board() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        let mut r = report(true, "In progress");
        r.live.current_position = Some(fen.to_string());
        let view = apply(&ViewState::default(), r.clone());
        assert_eq!(view.board.as_deref(), Some(fen));

        for pos in [None, Some("start".to_string())] {
            let mut r2 = r.clone();
            r2.live.current_position = pos;
            let out = reconcile(&view, r2);
            assert_eq!(out.state.board.as_deref(), Some(fen));
            assert!(!out.redraws.iter().any(|d| matches!(d, Redraw::Board(_))));
        }
    }

    #[test]
    fn move_log_is_replaced_not_appended() {
        let mut r = report(true, "In progress");
        r.live.move_log = vec!["e2e4".to_string(), "e7e5".to_string()];
        let view = apply(&ViewState::default(), r.clone());

        r.live.move_log = vec!["d2d4".to_string()];
        let out = reconcile(&view, r);
        assert!(out
            .redraws
            .contains(&Redraw::MoveLog(vec!["d2d4".to_string()])));
    }

    #[test]
    fn history_rows_use_outcome_labels() {
        let mut r = report(false, "Idle");
        r.history = vec![GameHistoryEntry {
            game_number: 7,
            outcome: Outcome::OpponentWin,
            move_count: 38,
            exploration_rate_at_time: 0.25,
        }];
        let out = reconcile(&ViewState::default(), r);
        assert!(out.redraws.contains(&Redraw::History(vec![
            "Game 7 | Stockfish Won | 38 moves | Exploration: 0.25".to_string()
        ])));
    }

    #[test]
    fn opponent_warning_is_sticky() {
        let mut missing = report(true, "In progress");
        missing.live.opponent_available = false;
        let out = reconcile(&ViewState::default(), missing);
        assert!(out.state.opponent_warning);
        assert!(out.redraws.contains(&Redraw::OpponentWarning {
            opponent_label: OPPONENT_FALLBACK_LABEL
        }));

        let back = reconcile(&out.state, report(true, "In progress"));
        assert!(back.state.opponent_warning);
        assert!(!back
            .redraws
            .iter()
            .any(|d| matches!(d, Redraw::OpponentWarning { .. })));
    }

    #[test]
    fn trend_survives_live_reconciliation() {
        let mut view = ViewState::default();
        view.trend = crate::progress::aggregate(&[crate::snapshot::ProgressPoint {
            game_number: 1,
            outcome: Outcome::SelfWin,
        }]);
        let out = reconcile(&view, report(false, "Idle"));
        assert_eq!(out.state.trend, view.trend);
    }
}
