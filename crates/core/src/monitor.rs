//! Polling runtime: two timers, one trigger channel, one shared view.
//!
//! Single-threaded and cooperative. Every tick spawns its own local task, so
//! a slow fetch never delays the next tick and fetches for the same path may
//! overlap. Without `discard_superseded`, whichever fetch *completes* last
//! wins, even if it was issued first.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::TrainingApi;
use crate::config::MonitorConfig;
use crate::progress::apply_progress;
use crate::reconcile::{reconcile, Reconciliation};
use crate::render::{Redraw, RenderSink};
use crate::session::{SessionController, SessionEffects, SessionRequestState};
use crate::view::ViewState;

/// User-originated events fed into [`Monitor::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Re-run the live-status path now (display regained focus).
    Refresh,
    /// Start a run; `None` uses the configured default game count.
    Start(Option<u32>),
    Stop,
    Quit,
}

#[derive(Debug, Clone)]
struct PollOptions {
    status_interval: Duration,
    progress_interval: Duration,
    default_num_games: u32,
    discard_superseded: bool,
    trend_window: Option<usize>,
}

impl From<&MonitorConfig> for PollOptions {
    fn from(c: &MonitorConfig) -> Self {
        Self {
            status_interval: c.status_interval(),
            progress_interval: c.progress_interval(),
            default_num_games: c.default_num_games,
            discard_superseded: c.discard_superseded,
            trend_window: c.trend_window,
        }
    }
}

/// Issue order of fetches on one path.
#[derive(Debug, Default)]
struct FetchSequence {
    issued: u64,
    applied: u64,
}

impl FetchSequence {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Record `ticket` as applied unless a newer one already was.
    fn accept(&mut self, ticket: u64) -> bool {
        if ticket < self.applied {
            return false;
        }
        self.applied = ticket;
        true
    }
}

struct Shared<S> {
    view: ViewState,
    session: SessionController,
    sink: S,
    live_seq: FetchSequence,
    progress_seq: FetchSequence,
}

impl<S: RenderSink> Shared<S> {
    fn emit(&mut self, redraws: Vec<Redraw>) {
        for r in redraws {
            self.sink.redraw(r);
        }
    }

    fn emit_session(&mut self, effects: SessionEffects) {
        self.emit(effects.redraws);
        if let Some(notice) = effects.notice {
            self.sink.notify(&notice);
        }
    }
}

/// Owns the view, the session controller and the sink. Cheap to clone; all
/// clones share the same state.
pub struct Monitor<A, S> {
    api: Rc<A>,
    shared: Rc<RefCell<Shared<S>>>,
    options: PollOptions,
}

impl<A, S> Clone for Monitor<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: Rc::clone(&self.api),
            shared: Rc::clone(&self.shared),
            options: self.options.clone(),
        }
    }
}

impl<A: TrainingApi + 'static, S: RenderSink + 'static> Monitor<A, S> {
    pub fn new(api: A, sink: S, config: &MonitorConfig) -> Self {
        Self::with_view(api, sink, config, ViewState::default())
    }

    /// Start from an arbitrary view instead of the empty one.
    pub fn with_view(api: A, sink: S, config: &MonitorConfig, view: ViewState) -> Self {
        Self {
            api: Rc::new(api),
            shared: Rc::new(RefCell::new(Shared {
                view,
                session: SessionController::new(),
                sink,
                live_seq: FetchSequence::default(),
                progress_seq: FetchSequence::default(),
            })),
            options: PollOptions::from(config),
        }
    }

    /// Copy of the current view.
    pub fn view(&self) -> ViewState {
        self.shared.borrow().view.clone()
    }

    /// One fast-path cycle: fetch live status, reconcile, render.
    pub async fn poll_live_status(&self) {
        let ticket = self.shared.borrow_mut().live_seq.issue();
        let result = self.api.fetch_live_status().await;

        let mut shared = self.shared.borrow_mut();
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!(path = "live-status", kind = e.kind(), %e, "poll failed");
                return;
            }
        };
        if !shared.live_seq.accept(ticket) && self.options.discard_superseded {
            debug!(ticket, "discarding superseded live-status result");
            return;
        }

        let Reconciliation { state, redraws } = reconcile(&shared.view, report);
        debug!(
            ticket,
            redraws = redraws.len(),
            active = state.training_active,
            "live status applied"
        );
        shared.view = state;
        let Shared { view, session, .. } = &mut *shared;
        session.settle(view);
        shared.emit(redraws);
    }

    /// One slow-path cycle: fetch progress history, aggregate, render.
    pub async fn poll_progress(&self) {
        let ticket = self.shared.borrow_mut().progress_seq.issue();
        let result = self.api.fetch_progress_history().await;

        let mut shared = self.shared.borrow_mut();
        let points = match result {
            Ok(points) => points,
            Err(e) => {
                warn!(path = "progress-history", kind = e.kind(), %e, "poll failed");
                return;
            }
        };
        if !shared.progress_seq.accept(ticket) && self.options.discard_superseded {
            debug!(ticket, "discarding superseded progress result");
            return;
        }

        let Reconciliation { state, redraws } =
            apply_progress(&shared.view, &points, self.options.trend_window);
        debug!(ticket, games = points.len(), "progress applied");
        shared.view = state;
        shared.emit(redraws);
    }

    pub async fn start_training(&self, num_games: u32) {
        {
            let mut shared = self.shared.borrow_mut();
            if num_games == 0 {
                shared.sink.notify("Error: number of games must be at least 1");
                return;
            }
            if !shared.view.controls.start_enabled {
                shared.sink.notify("Training is already running");
                return;
            }
            if shared.session.state() != SessionRequestState::Idle {
                shared.sink.notify("A training request is already in progress");
                return;
            }
            let Shared { view, session, .. } = &mut *shared;
            let effects = session.begin_start(view);
            shared.emit_session(effects);
        }
        info!(num_games, "starting training");

        let result = self.api.start_training(num_games).await;

        let mut shared = self.shared.borrow_mut();
        let Shared { view, session, .. } = &mut *shared;
        let effects = session.finish_start(view, result);
        shared.emit_session(effects);
    }

    pub async fn stop_training(&self) {
        {
            let mut shared = self.shared.borrow_mut();
            if !shared.view.controls.stop_enabled {
                shared.sink.notify("No training run to stop");
                return;
            }
            if shared.session.state() != SessionRequestState::Idle {
                shared.sink.notify("A training request is already in progress");
                return;
            }
            let Shared { view, session, .. } = &mut *shared;
            let effects = session.begin_stop(view);
            shared.emit_session(effects);
        }
        info!("stopping training");

        let result = self.api.stop_training().await;

        let mut shared = self.shared.borrow_mut();
        let Shared { view, session, .. } = &mut *shared;
        let effects = session.finish_stop(view, result);
        shared.emit_session(effects);
    }

    /// Drive both timers and the trigger channel until `Quit` or until every
    /// sender is dropped.
    ///
    /// Must run inside a `tokio::task::LocalSet`. Both timers fire once
    /// immediately. In-flight fetches are abandoned with the `LocalSet`.
    pub async fn run(&self, mut triggers: mpsc::UnboundedReceiver<Trigger>) {
        let mut live = time::interval(self.options.status_interval);
        let mut progress = time::interval(self.options.progress_interval);
        live.set_missed_tick_behavior(MissedTickBehavior::Delay);
        progress.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            status_ms = self.options.status_interval.as_millis() as u64,
            progress_ms = self.options.progress_interval.as_millis() as u64,
            "monitor running"
        );

        loop {
            tokio::select! {
                _ = live.tick() => self.spawn_live(),
                _ = progress.tick() => {
                    let m = self.clone();
                    tokio::task::spawn_local(async move { m.poll_progress().await });
                }
                trigger = triggers.recv() => match trigger {
                    Some(Trigger::Refresh) => self.spawn_live(),
                    Some(Trigger::Start(n)) => {
                        let m = self.clone();
                        let n = n.unwrap_or(self.options.default_num_games);
                        tokio::task::spawn_local(async move { m.start_training(n).await });
                    }
                    Some(Trigger::Stop) => {
                        let m = self.clone();
                        tokio::task::spawn_local(async move { m.stop_training().await });
                    }
                    Some(Trigger::Quit) | None => break,
                },
            }
        }
        info!("monitor stopped");
    }

    fn spawn_live(&self) {
        let m = self.clone();
        tokio::task::spawn_local(async move { m.poll_live_status().await });
    }
}
