//! Line-based command input on stdin.
//!
//! Each line is one command. Parsing happens on a background task; parsed
//! actions are queued for the event loop, which applies them to the
//! controller on its own thread.

use crate::ControlAction;
use glam::DQuat;
use orient_core::{AngleUnit, EulerAngles, RotationOrder};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub const HELP: &str = "\
Commands:
  euler <roll> <pitch> <yaw>   convert Euler angles (active unit/order) to a quaternion
  quat <x> <y> <z> <w>         convert a quaternion to Euler angles
  unit deg|rad                 select the angle unit
  order XYZ|ZYX|YXZ|ZXY        select the rotation order
  reset                        back to identity
  show                         print both representations
  help                         this text
  quit                         exit
Keys: 1/2/3 nudge roll/pitch/yaw (Shift: back), U unit, O order, Q quaternion -> Euler, R reset, Esc quit";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Unknown command {0:?} (try \"help\")")]
    UnknownCommand(String),
    #[error("\"{command}\" takes {expected} argument(s), got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Not a finite number: {0:?}")]
    InvalidNumber(String),
    #[error("Unknown angle unit {0:?} (expected deg or rad)")]
    UnknownUnit(String),
    #[error("Unknown rotation order {0:?} (expected XYZ, ZYX, YXZ or ZXY)")]
    UnknownOrder(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ControlAction>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let action = match command.to_ascii_lowercase().as_str() {
        "euler" | "e" => {
            let [roll, pitch, yaw] = numbers::<3>("euler", &args)?;
            ControlAction::ApplyEuler(EulerAngles::new(roll, pitch, yaw))
        }
        "quat" | "q" => {
            let [x, y, z, w] = numbers::<4>("quat", &args)?;
            ControlAction::ApplyQuaternion(DQuat::from_xyzw(x, y, z, w))
        }
        "unit" => {
            let [unit] = words_exact::<1>("unit", &args)?;
            let unit = unit
                .parse::<AngleUnit>()
                .map_err(|_| CommandError::UnknownUnit(unit.to_string()))?;
            ControlAction::SetUnit(unit)
        }
        "order" => {
            let [order] = words_exact::<1>("order", &args)?;
            let order = order
                .parse::<RotationOrder>()
                .map_err(|_| CommandError::UnknownOrder(order.to_string()))?;
            ControlAction::SetOrder(order)
        }
        "reset" => no_args("reset", &args, ControlAction::Reset)?,
        "show" => no_args("show", &args, ControlAction::Show)?,
        "help" | "?" => ControlAction::Help,
        "quit" | "exit" => ControlAction::Quit,
        _ => return Err(CommandError::UnknownCommand(command.to_string())),
    };

    Ok(Some(action))
}

fn words_exact<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], CommandError> {
    <[&str; N]>::try_from(args).map_err(|_| CommandError::WrongArity {
        command,
        expected: N,
        got: args.len(),
    })
}

fn numbers<const N: usize>(command: &'static str, args: &[&str]) -> Result<[f64; N], CommandError> {
    let words = words_exact::<N>(command, args)?;
    let mut out = [0.0; N];
    for (slot, word) in out.iter_mut().zip(words) {
        *slot = word
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CommandError::InvalidNumber(word.to_string()))?;
    }
    Ok(out)
}

fn no_args(
    command: &'static str,
    args: &[&str],
    action: ControlAction,
) -> Result<ControlAction, CommandError> {
    words_exact::<0>(command, args).map(|_| action)
}

/// Reads commands from stdin on a background task.
pub struct Console {
    command_rx: mpsc::UnboundedReceiver<ControlAction>,
    _task: tokio::task::JoinHandle<()>,
}

impl Console {
    /// Start reading stdin. Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(console_read_loop(command_tx));
        tracing::info!("Console ready, type \"help\" for commands");
        Self {
            command_rx,
            _task: task,
        }
    }

    /// Next queued action, if any (non-blocking).
    pub fn try_next(&mut self) -> Option<ControlAction> {
        self.command_rx.try_recv().ok()
    }
}

/// Background task: read lines, parse, forward actions.
async fn console_read_loop(command_tx: mpsc::UnboundedSender<ControlAction>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Ok(Some(action)) => {
                    if command_tx.send(action).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(%e, "Ignoring console input"),
            },
            Ok(None) => {
                tracing::debug!("Console input closed");
                break;
            }
            Err(e) => {
                tracing::error!(?e, "Console read error");
                break;
            }
        }
    }
}
