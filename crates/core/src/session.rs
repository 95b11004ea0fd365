//! Start/stop request handling.
//!
//! Each command is split in two halves around the network call: `begin_*`
//! applies the optimistic local arrangement, `finish_*` applies the outcome.
//! Both halves are synchronous and only touch the view, so the monitor can
//! await the request in between without holding any borrow.

use tracing::{info, warn};

use crate::api::StartAccepted;
use crate::error::CommandError;
use crate::render::Redraw;
use crate::ui_model::{
    Controls, StatusLine, StatusTag, DEFAULT_STARTED_TEXT, OPPONENT_FALLBACK_LABEL, STARTING_TEXT,
    STOPPED_TEXT,
};
use crate::view::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionRequestState {
    #[default]
    Idle,
    StartRequested,
    StopRequested,
}

/// Redraws and an optional blocking notice produced by one step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionEffects {
    pub redraws: Vec<Redraw>,
    pub notice: Option<String>,
}

/// What the display looked like before a request went out.
#[derive(Debug, Clone, PartialEq)]
struct Restore {
    controls: Controls,
    status: StatusLine,
}

#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionRequestState,
    restore: Option<Restore>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionRequestState {
        self.state
    }

    /// Optimistically show a starting run.
    pub fn begin_start(&mut self, view: &mut ViewState) -> SessionEffects {
        self.enter(SessionRequestState::StartRequested, view);
        view.controls = Controls::RUNNING;
        view.status = StatusLine::new(STARTING_TEXT, StatusTag::Active);
        SessionEffects {
            redraws: vec![
                Redraw::Controls(view.controls),
                Redraw::Status(view.status.clone()),
            ],
            notice: None,
        }
    }

    pub fn finish_start(
        &mut self,
        view: &mut ViewState,
        result: Result<StartAccepted, CommandError>,
    ) -> SessionEffects {
        let restore = self.leave();
        let mut effects = SessionEffects::default();

        match result {
            Ok(accepted) => {
                info!(message = %accepted.message, "training start accepted");
                let text = if accepted.message.is_empty() {
                    DEFAULT_STARTED_TEXT.to_string()
                } else {
                    accepted.message
                };
                view.status = StatusLine::new(text, StatusTag::Active);
                effects.redraws.push(Redraw::Status(view.status.clone()));
                if !accepted.opponent_available && !view.opponent_warning {
                    view.opponent_warning = true;
                    effects.redraws.push(Redraw::OpponentWarning {
                        opponent_label: OPPONENT_FALLBACK_LABEL,
                    });
                }
            }
            Err(CommandError::Rejected(reason)) => {
                warn!(%reason, "training start rejected");
                let status = restore.map(|r| r.status).unwrap_or_default();
                self.revert(view, Controls::IDLE, status, &mut effects);
                effects.notice = Some(format!("Error: {reason}"));
            }
            Err(e @ CommandError::Unreachable(_)) => {
                warn!(%e, "training start failed");
                let (controls, status) = match restore {
                    Some(r) => (r.controls, r.status),
                    None => (Controls::IDLE, StatusLine::default()),
                };
                self.revert(view, controls, status, &mut effects);
                effects.notice = Some(format!("Error starting training: {e}"));
            }
        }
        effects
    }

    /// Stopping shows nothing until the request completes.
    pub fn begin_stop(&mut self, view: &mut ViewState) -> SessionEffects {
        self.enter(SessionRequestState::StopRequested, view);
        SessionEffects::default()
    }

    /// Any answer counts as stopped. Only an unreachable server keeps the
    /// previous arrangement.
    pub fn finish_stop(
        &mut self,
        view: &mut ViewState,
        result: Result<(), CommandError>,
    ) -> SessionEffects {
        let restore = self.leave();
        let mut effects = SessionEffects::default();

        match result {
            Ok(()) | Err(CommandError::Rejected(_)) => {
                info!("training stop sent");
                let status = StatusLine::new(STOPPED_TEXT, StatusTag::Inactive);
                self.revert(view, Controls::IDLE, status, &mut effects);
            }
            Err(e @ CommandError::Unreachable(_)) => {
                warn!(%e, "training stop failed");
                if let Some(r) = restore {
                    self.revert(view, r.controls, r.status, &mut effects);
                }
                effects.notice = Some(format!("Error stopping training: {e}"));
            }
        }
        effects
    }

    /// A live snapshot was just reconciled into `view`: server truth now owns
    /// the controls, so any pending local arrangement is dropped and the
    /// reconciled display becomes what a failed request falls back to.
    pub fn settle(&mut self, view: &ViewState) {
        if self.state == SessionRequestState::Idle {
            return;
        }
        info!(pending = ?self.state, "server state superseded pending request");
        self.restore = Some(Restore {
            controls: view.controls,
            status: view.status.clone(),
        });
        self.state = SessionRequestState::Idle;
    }

    fn enter(&mut self, state: SessionRequestState, view: &ViewState) {
        self.state = state;
        self.restore = Some(Restore {
            controls: view.controls,
            status: view.status.clone(),
        });
    }

    fn leave(&mut self) -> Option<Restore> {
        self.state = SessionRequestState::Idle;
        self.restore.take()
    }

    fn revert(
        &self,
        view: &mut ViewState,
        controls: Controls,
        status: StatusLine,
        effects: &mut SessionEffects,
    ) {
        if view.controls != controls {
            view.controls = controls;
            effects.redraws.push(Redraw::Controls(controls));
        }
        if view.status != status {
            view.status = status;
            effects.redraws.push(Redraw::Status(view.status.clone()));
        }
    }
}
