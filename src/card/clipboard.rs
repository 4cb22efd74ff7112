//! System clipboard access.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Something text can be copied into
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard helper programs, tried in order
const HELPERS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// Copies through the first clipboard helper found on the system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn pipe_into(program: &str, args: &[&str], text: &str) -> Result<()> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", program))?;

        // stdin is dropped at the end of the match, closing the pipe
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        if let Err(e) = written {
            // Reap the helper before reporting
            if let Err(kill_err) = child.kill() {
                debug!("{} already exited: {}", program, kill_err);
            }
            let _ = child.wait();
            return Err(e).with_context(|| format!("Failed to write to {} stdin", program));
        }

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {}", program))?;
        if !status.success() {
            anyhow::bail!("{} exited with {}", program, status);
        }

        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut last_error = None;

        for (program, args) in HELPERS {
            match Self::pipe_into(program, args, text) {
                Ok(()) => {
                    debug!("Copied {} bytes via {}", text.len(), program);
                    return Ok(());
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No clipboard helper available")))
    }
}
