//! # rookwatch
//!
//! Client-side state synchronization for watching a remote chess self-play
//! training run (a Q-learning agent playing against an engine opponent).
//!
//! The server never pushes. This crate polls two read endpoints on fixed
//! intervals, folds each snapshot into a last-known-good [`ViewState`], and
//! emits region-level [`Redraw`] effects into a [`RenderSink`]. A failed or
//! malformed fetch leaves the view exactly as it was.
//!
//! ## Pieces
//!
//! - [`api`]: the [`TrainingApi`] seam and its HTTP implementation
//! - [`reconcile`]: live-status snapshot → new view + redraw set
//! - [`progress`]: cumulative win-rate series over the game history
//! - [`session`]: start/stop request state machine
//! - [`monitor`]: the two polling timers and the user trigger channel
//!
//! ## Execution model
//!
//! Everything runs on one thread. [`Monitor::run`] spawns its fetches with
//! `tokio::task::spawn_local`, so it must be driven inside a
//! `tokio::task::LocalSet`:
//!
//! ```no_run
//! use rookwatch::{HttpTrainingApi, Monitor, MonitorConfig, Redraw, RenderSink};
//!
//! struct Log;
//! impl RenderSink for Log {
//!     fn redraw(&mut self, redraw: Redraw) {
//!         println!("{redraw:?}");
//!     }
//!     fn notify(&mut self, message: &str) {
//!         eprintln!("{message}");
//!     }
//! }
//!
//! let config = MonitorConfig::default();
//! let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
//! let local = tokio::task::LocalSet::new();
//! local.block_on(&rt, async {
//!     let monitor = Monitor::new(HttpTrainingApi::new(&config), Log, &config);
//!     let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
//!     monitor.run(rx).await;
//! });
//! ```

pub mod api;
pub mod config;
pub mod monitor;
pub mod progress;
pub mod reconcile;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod ui_model;
pub mod view;

mod error;
mod http;
mod paths;

pub use api::{HttpTrainingApi, StartAccepted, TrainingApi};
pub use config::MonitorConfig;
pub use error::{CommandError, ConfigError, FetchError};
pub use monitor::{Monitor, Trigger};
pub use progress::{aggregate, WinRatePoint, WinRateSeries};
pub use reconcile::{reconcile, Reconciliation};
pub use render::{Redraw, RenderSink};
pub use session::{SessionController, SessionRequestState};
pub use snapshot::{
    GameHistoryEntry, LiveStatusSnapshot, MetricsSnapshot, Outcome, ProgressPoint, StatusReport,
};
pub use ui_model::{Controls, StatusLine, StatusTag};
pub use view::ViewState;
