//! SCP engine error types.
//!
//! Every protocol checkpoint failure carries enough context (step name,
//! remote-supplied diagnostic) to log or present to a user. No component
//! swallows a protocol-level error, and channel/file resources are always
//! released before an error propagates.

use thiserror::Error;

/// SCP engine errors.
#[derive(Error, Debug)]
pub enum ScpError {
    /// Channel connect retry budget exhausted without a successful connect.
    #[error("channel failed to connect after {attempts} attempts")]
    Connection {
        /// Number of connect attempts made.
        attempts: u32,
    },

    /// Remote signalled a recoverable error (ack byte `0x01`) at a checkpoint.
    ///
    /// Recoverable on the remote side only: the current operation still
    /// aborts, but the distinction from [`ScpError::RemoteFatal`] is kept so
    /// callers can tell a permission problem from a broken peer.
    #[error("remote error at {step}: {message}")]
    Remote {
        /// Protocol step at which the ack was read.
        step: &'static str,
        /// Remote-supplied diagnostic, verbatim.
        message: String,
    },

    /// Remote signalled a fatal error (ack byte `0x02`) at a checkpoint.
    #[error("remote fatal error at {step}: {message}")]
    RemoteFatal {
        /// Protocol step at which the ack was read.
        step: &'static str,
        /// Remote-supplied diagnostic, verbatim.
        message: String,
    },

    /// The channel closed where an ack or header byte was due.
    #[error("unexpected end of stream at {step}")]
    UnexpectedEof {
        /// Protocol step at which the stream ended.
        step: &'static str,
    },

    /// A configured abort pattern matched a line of remote shell output.
    #[error("abort pattern matched: {line}")]
    AbortMatched {
        /// The (escape-stripped) line that matched.
        line: String,
    },

    /// Malformed or unsafe transfer header.
    #[error("invalid transfer header: {0}")]
    InvalidHeader(String),

    /// I/O error on the channel or the local filesystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for SCP engine operations
pub type Result<T> = std::result::Result<T, ScpError>;
