//! The effect boundary. Nothing rendered ever flows back into the view.

use crate::progress::WinRateSeries;
use crate::snapshot::MetricsSnapshot;
use crate::ui_model::{Controls, StatusLine};

/// One region of the display that must be repainted.
#[derive(Debug, Clone, PartialEq)]
pub enum Redraw {
    /// New board position (FEN).
    Board(String),
    Status(StatusLine),
    /// Full move log, or a single placeholder line when empty.
    MoveLog(Vec<String>),
    /// Current game number, or `-`.
    CurrentGame(String),
    Metrics(MetricsSnapshot),
    /// Recent-games rows, or a single placeholder row when empty.
    History(Vec<String>),
    Trend(WinRateSeries),
    Controls(Controls),
    /// Raise the opponent warning and relabel the opponent.
    OpponentWarning { opponent_label: &'static str },
}

/// Something that can paint [`Redraw`]s and show blocking notices.
pub trait RenderSink {
    fn redraw(&mut self, redraw: Redraw);

    /// User-facing error notice (start/stop failures).
    fn notify(&mut self, message: &str);
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn redraw(&mut self, redraw: Redraw) {
        (**self).redraw(redraw);
    }

    fn notify(&mut self, message: &str) {
        (**self).notify(message);
    }
}

/// Sink that keeps everything it was given, shared with the test body.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSink {
    inner: std::rc::Rc<std::cell::RefCell<Recorded>>,
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Recorded {
    pub redraws: Vec<Redraw>,
    pub notices: Vec<String>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn redraws(&self) -> Vec<Redraw> {
        self.inner.borrow().redraws.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.inner.borrow().notices.clone()
    }

    pub fn clear(&self) {
        let mut r = self.inner.borrow_mut();
        r.redraws.clear();
        r.notices.clear();
    }
}

#[cfg(test)]
impl RenderSink for RecordingSink {
    fn redraw(&mut self, redraw: Redraw) {
        self.inner.borrow_mut().redraws.push(redraw);
    }

    fn notify(&mut self, message: &str) {
        self.inner.borrow_mut().notices.push(message.to_string());
    }
}
