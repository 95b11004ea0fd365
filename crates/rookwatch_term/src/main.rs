//! rookwatch - terminal monitor for a chess self-play training server
//!
//! Polls the server's live status every second and its game history every
//! five seconds, printing only the regions that changed. Type commands on
//! stdin while it runs:
//!
//!   start [N]   start a run of N games (default from config)
//!   stop        stop the current run
//!   refresh     poll live status right now
//!   quit        exit
//!
//! Logs go to stderr (`RUST_LOG=rookwatch=debug` for per-poll detail).

mod commands;
mod term;

use std::path::PathBuf;

use clap::Parser;
use rookwatch::{HttpTrainingApi, Monitor, MonitorConfig, Trigger};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use commands::{parse_command, Command, HELP};
use term::TerminalSink;

#[derive(Debug, Parser)]
#[command(name = "rookwatch", version, about = "Watch a chess self-play training run")]
struct Cli {
    /// Training server base URL.
    #[arg(long)]
    server: Option<String>,

    /// Extra TOML config file, layered over the user and project files.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default game count for `start`.
    #[arg(long)]
    games: Option<u32>,

    #[arg(long)]
    status_interval_ms: Option<u64>,

    #[arg(long)]
    progress_interval_ms: Option<u64>,

    /// Poll each path once, print, and exit.
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut MonitorConfig) {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(games) = self.games {
            config.default_num_games = games;
        }
        if let Some(ms) = self.status_interval_ms {
            config.status_interval_ms = ms;
        }
        if let Some(ms) = self.progress_interval_ms {
            config.progress_interval_ms = ms;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rookwatch=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = MonitorConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;
    info!(server = %config.server_url, "configuration loaded");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = LocalSet::new();
    local.block_on(&rt, run(config, cli.once));
    drop(local);
    // A pending stdin read would otherwise hold shutdown until the next line.
    rt.shutdown_background();
    Ok(())
}

async fn run(config: MonitorConfig, once: bool) {
    let mut sink = TerminalSink::stdout();
    sink.header();
    let monitor = Monitor::new(HttpTrainingApi::new(&config), sink, &config);

    if once {
        monitor.poll_live_status().await;
        monitor.poll_progress().await;
        return;
    }

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::task::spawn_local(read_commands(tx.clone()));
    tokio::task::spawn_local(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C: shutting down");
            let _ = tx.send(Trigger::Quit);
        }
    });

    monitor.run(rx).await;
}

/// Forward stdin commands until EOF. EOF does not stop the monitor.
async fn read_commands(tx: mpsc::UnboundedSender<Trigger>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Ok(Command::Trigger(trigger)) => {
                    if tx.send(trigger).is_err() {
                        return;
                    }
                }
                Ok(Command::Help) => println!("{HELP}"),
                Ok(Command::Nothing) => {}
                Err(e) => warn!("{e}"),
            },
            Ok(None) => {
                info!("stdin closed; commands disabled");
                return;
            }
            Err(e) => {
                error!("stdin read failed: {e}");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_loaded_config() {
        let cli = Cli::parse_from([
            "rookwatch",
            "--server",
            "http://trainer:9000",
            "--games",
            "3",
            "--status-interval-ms",
            "250",
        ]);
        let mut config = MonitorConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.server_url, "http://trainer:9000");
        assert_eq!(config.default_num_games, 3);
        assert_eq!(config.status_interval_ms, 250);
        assert_eq!(config.progress_interval_ms, 5000);
        assert!(!cli.once);
    }
}
