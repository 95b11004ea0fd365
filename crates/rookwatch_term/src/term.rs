//! Terminal rendering of redraws: one tagged line (or block) per region.

use std::io::Write;

use rookwatch::progress::WinRateSeries;
use rookwatch::ui_model::{Controls, OPPONENT_LABEL, SELF_LABEL};
use rookwatch::{MetricsSnapshot, Redraw, RenderSink};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Most recent moves shown per repaint.
const MOVE_TAIL: usize = 12;

pub struct TerminalSink<W: Write> {
    out: W,
    opponent: &'static str,
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            opponent: OPPONENT_LABEL,
        }
    }

    pub fn header(&mut self) {
        let line = format!("{SELF_LABEL} vs {}", self.opponent);
        self.write_line(&line);
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        // A closed stdout is not worth tearing the monitor down for.
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn redraw(&mut self, redraw: Redraw) {
        match redraw {
            Redraw::Board(fen) => self.write_line(&format!("[board]    {fen}")),
            Redraw::Status(status) => {
                let line = format!("[status]   {} ({})", status.text, status.tag.class());
                self.write_line(&line);
            }
            Redraw::MoveLog(lines) => {
                let skip = lines.len().saturating_sub(MOVE_TAIL);
                let shown = lines[skip..].join("  ");
                self.write_line(&format!("[moves]    {shown}"));
            }
            Redraw::CurrentGame(label) => self.write_line(&format!("[game]     {label}")),
            Redraw::Metrics(m) => self.write_line(&format!("[metrics]  {}", metrics_line(&m))),
            Redraw::History(rows) => {
                self.write_line("[history]");
                for row in rows {
                    self.write_line(&format!("  {row}"));
                }
            }
            Redraw::Trend(series) => self.write_line(&format!("[trend]    {}", trend_line(&series))),
            Redraw::Controls(c) => self.write_line(&format!("[controls] {}", controls_line(c))),
            Redraw::OpponentWarning { opponent_label } => {
                self.opponent = opponent_label;
                self.write_line(&format!(
                    "[warning]  Stockfish not available; opponent is now {opponent_label}"
                ));
                self.header();
            }
        }
    }

    fn notify(&mut self, message: &str) {
        self.write_line(&format!("!! {message}"));
    }
}

pub fn metrics_line(m: &MetricsSnapshot) -> String {
    format!(
        "games {} | Q-Learning {} | Stockfish {} | draws {} | win rate {}% | avg moves {} | exploration {} | states {}",
        m.total_games,
        m.wins_self,
        m.wins_opponent,
        m.draws,
        m.win_rate_pct,
        m.avg_moves,
        m.exploration_rate,
        m.states_learned
    )
}

pub fn trend_line(series: &WinRateSeries) -> String {
    let spark: String = series
        .points()
        .iter()
        .map(|p| {
            let idx = ((p.win_rate_pct / 100.0) * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect();
    match series.last() {
        Some(last) => format!("{spark} {} {:.2}%", last.label(), last.rounded_pct()),
        None => String::new(),
    }
}

fn controls_line(c: Controls) -> String {
    let mark = |on: bool| if on { "enabled" } else { "disabled" };
    format!("start {} | stop {}", mark(c.start_enabled), mark(c.stop_enabled))
}
