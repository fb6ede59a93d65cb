use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use crate::provider::LaunchAction;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("empty launch target")]
    EmptyTarget,
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} could not receive input: {source}")]
    Pipe {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Carries out the side effect behind a selected result.
pub trait ActionExecutor {
    fn execute(&mut self, action: &LaunchAction) -> Result<(), LaunchError>;
}

/// Starts programs through a short-lived `sh` that backgrounds them and
/// exits, so the launcher reaps every direct child and the program itself is
/// reparented. Applications run via `sh -c`, URLs via `xdg-open` and
/// clipboard text is piped into `wl-copy`.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl ActionExecutor for SystemExecutor {
    fn execute(&mut self, action: &LaunchAction) -> Result<(), LaunchError> {
        match action {
            LaunchAction::LaunchApp { command, .. } => {
                let command = non_empty(command)?;
                spawn_detached("sh", &["-c", command])
            }
            LaunchAction::OpenUrl(url) => {
                let url = non_empty(url)?;
                spawn_detached("xdg-open", &[url])
            }
            LaunchAction::CopyText(text) => {
                let text = non_empty(text)?;
                copy_to_clipboard(text)
            }
        }
    }
}

fn non_empty(value: &str) -> Result<&str, LaunchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(LaunchError::EmptyTarget)
    } else {
        Ok(trimmed)
    }
}

/// Runs `program args..` in the background of a throwaway shell and waits for
/// that shell only.
fn spawn_detached(program: &str, args: &[&str]) -> Result<(), LaunchError> {
    log::info!("spawning {program} {args:?}");
    let status = Command::new("sh")
        .arg("-c")
        .arg(r#""$@" &"#)
        .arg("sh")
        .arg(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })?;
    check_status(program, status)
}

fn copy_to_clipboard(text: &str) -> Result<(), LaunchError> {
    let program = "wl-copy";
    let mut child = Command::new(program)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // stdin is dropped before waiting so wl-copy sees end of input.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait().map_err(|source| LaunchError::Spawn {
        program: program.to_string(),
        source,
    })?;
    written.map_err(|source| LaunchError::Pipe {
        program: program.to_string(),
        source,
    })?;
    check_status(program, status)
}

fn check_status(program: &str, status: ExitStatus) -> Result<(), LaunchError> {
    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::Failed {
            program: program.to_string(),
            status,
        })
    }
}
