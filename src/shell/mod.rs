//! Interactive shell command driver.
//!
//! Drives an ordered sequence of [`CommandStep`]s over a shell channel:
//! each command is written with a trailing newline, and when the step
//! declares an expected sentinel substring the driver scans remote output
//! lines (escape-stripped, forwarded to the listener) until the sentinel
//! appears. An optional abort pattern stops the whole sequence the moment
//! it matches a line.

mod strip;

pub use strip::strip_escapes;

use std::io::{Read, Write};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelKind, Connector, LineSink, Session};
use crate::error::{Result, ScpError};

/// One command in a shell sequence, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStep {
    /// Command text, written to the shell with a trailing newline.
    pub command: String,
    /// Substring whose appearance in a line of output completes the step.
    /// Steps without a sentinel are fire-and-forget.
    pub expect: Option<String>,
}

impl CommandStep {
    /// Fire-and-forget step.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            expect: None,
        }
    }

    /// Step that waits until `sentinel` appears in a line of output.
    pub fn with_expect(command: impl Into<String>, sentinel: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            expect: Some(sentinel.into()),
        }
    }
}

/// Drives command sequences over shell channels.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    connector: Connector,
}

impl ShellRunner {
    /// Create a runner whose channels are connected by `connector`.
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Open a shell channel on `session` and drive `steps` in order.
    ///
    /// Every output line consumed while waiting for a sentinel is
    /// escape-stripped and forwarded to `listener`. If `abort` matches a
    /// line, the sequence stops with [`ScpError::AbortMatched`] and no
    /// further steps run. The channel is disconnected on every exit path.
    pub fn run<S: Session>(
        &self,
        session: &S,
        steps: &[CommandStep],
        abort: Option<&Regex>,
        listener: &mut dyn LineSink,
    ) -> Result<()> {
        let mut channel = self.connector.connect(session, &ChannelKind::Shell, listener)?;
        let result = drive(&mut channel, steps, abort, listener);
        channel.disconnect();
        if let Err(e) = &result {
            tracing::warn!(error = %e, "shell sequence failed");
        }
        result
    }
}

fn drive<C: Channel>(
    channel: &mut C,
    steps: &[CommandStep],
    abort: Option<&Regex>,
    listener: &mut dyn LineSink,
) -> Result<()> {
    for step in steps {
        tracing::debug!(command = %step.command, "sending command");
        channel.write_all(step.command.as_bytes())?;
        channel.write_all(b"\n")?;
        channel.flush()?;

        let Some(sentinel) = &step.expect else {
            continue;
        };

        loop {
            let line = match read_line(channel)? {
                Some(line) => line,
                None => return Err(ScpError::UnexpectedEof { step: "shell" }),
            };
            let clean = strip_escapes(&line);
            listener.line(&clean);

            if let Some(pattern) = abort {
                if pattern.is_match(&clean) {
                    return Err(ScpError::AbortMatched {
                        line: clean.into_owned(),
                    });
                }
            }
            if clean.contains(sentinel.as_str()) {
                break;
            }
        }
    }
    Ok(())
}

/// Read one `\n`-terminated line from the channel.
///
/// Returns `None` on a clean end of stream; a stream ending mid-line
/// yields the partial line first.
fn read_line<R: Read + ?Sized>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        buf.push(byte[0]);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
