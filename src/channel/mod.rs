//! Channel seam between the SCP engine and the secure transport.
//!
//! The engine does not implement transport security. It consumes a narrow
//! interface: a [`Session`] that can open logical channels, and a
//! [`Channel`] that is a blocking duplex byte stream with connect and
//! disconnect lifecycle calls. Concrete implementations wrap whatever
//! secure-transport library the embedding application uses; the engine
//! itself only ever drives these traits.
//!
//! Progress and diagnostic lines flow out through the [`LineSink`]
//! capability, invoked synchronously on the calling thread.

mod connector;

pub use connector::{Connector, RetryState};

use std::io::{Read, Write};
use std::time::Duration;

/// Kind of logical channel to open over a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    /// Execute a single remote command (used by the transfer drivers).
    Exec {
        /// The remote command line.
        command: String,
    },
    /// An interactive shell (used by the shell driver).
    Shell,
}

impl ChannelKind {
    /// Exec channel running the remote sink: `scp -p -t <remote_path>`.
    pub fn scp_sink(remote_path: &str) -> Self {
        ChannelKind::Exec {
            command: format!("scp -p -t {remote_path}"),
        }
    }

    /// Exec channel running the remote source: `scp -f <remote_path>`.
    pub fn scp_source(remote_path: &str) -> Self {
        ChannelKind::Exec {
            command: format!("scp -f {remote_path}"),
        }
    }
}

/// An established secure session capable of opening channels.
///
/// Key exchange, encryption, and authentication are the caller's problem;
/// by the time the engine sees a `Session` it must already be usable.
pub trait Session {
    /// Concrete channel type produced by this session.
    type Chan: Channel;

    /// Open a new, not-yet-connected channel of the given kind.
    fn open_channel(&self, kind: &ChannelKind) -> std::io::Result<Self::Chan>;
}

/// One open logical stream pair over a [`Session`].
///
/// A channel is connected before any protocol bytes are written or read,
/// is never shared between logical operations, and is disconnected exactly
/// once on every exit path. Reads and writes block the calling thread.
pub trait Channel: Read + Write {
    /// Connect the channel, waiting at most `timeout`.
    fn connect(&mut self, timeout: Duration) -> std::io::Result<()>;

    /// Whether the channel currently reports itself connected.
    fn is_connected(&self) -> bool;

    /// Disconnect the channel. Must be safe to call on a channel that
    /// never connected or already disconnected.
    fn disconnect(&mut self);
}

/// Capability for receiving transfer/shell progress lines.
///
/// Invoked synchronously on the calling thread; implementations should
/// return quickly.
pub trait LineSink {
    /// Receive one line of progress or remote output.
    fn line(&mut self, line: &str);
}

impl<F: FnMut(&str)> LineSink for F {
    fn line(&mut self, line: &str) {
        self(line);
    }
}
