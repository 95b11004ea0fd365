//! Line commands typed on stdin.

use rookwatch::Trigger;
use thiserror::Error;

pub const HELP: &str = "commands: start [N] | stop | refresh | quit | help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Trigger(Trigger),
    Help,
    /// Blank line.
    Nothing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' is not a valid game count")]
    BadCount(String),

    #[error("too many arguments for '{0}'")]
    TooManyArgs(String),
}

pub fn parse_command(line: &str) -> Result<Command, CommandParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Nothing);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(CommandParseError::TooManyArgs(head.to_string()));
    }

    let no_arg = |cmd: Command| match arg {
        Some(_) => Err(CommandParseError::TooManyArgs(head.to_string())),
        None => Ok(cmd),
    };

    match head.to_ascii_lowercase().as_str() {
        "start" | "s" => {
            let count = arg
                .map(|a| {
                    a.parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| CommandParseError::BadCount(a.to_string()))
                })
                .transpose()?;
            Ok(Command::Trigger(Trigger::Start(count)))
        }
        "stop" | "x" => no_arg(Command::Trigger(Trigger::Stop)),
        "refresh" | "r" => no_arg(Command::Trigger(Trigger::Refresh)),
        "quit" | "q" | "exit" => no_arg(Command::Trigger(Trigger::Quit)),
        "help" | "h" | "?" => no_arg(Command::Help),
        _ => Err(CommandParseError::Unknown(head.to_string())),
    }
}
