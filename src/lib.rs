//! # scp-core - SCP Client Engine
//!
//! Client-side implementation of the SCP file-transfer sub-protocol over
//! an already-established secure byte channel, plus an interactive shell
//! command driver sharing the same channel abstraction.
//!
//! ## Features
//!
//! - **Sink/source drivers**: upload one file, download one or more files,
//!   bit-exact with the traditional `scp` program's framing
//! - **Bounded-retry connect**: growing timeout, listener notifications,
//!   pure state-machine core
//! - **Tagged acknowledgements**: `Ok | Warning | Fatal | Eof` instead of
//!   raw integer codes
//! - **Progress reporting**: throughput/ETA lines at 1-MiB boundaries
//! - **Shell driver**: sentinel-gated command sequences with abort
//!   patterns and terminal escape stripping
//!
//! ## Protocol Overview
//!
//! The engine consumes a narrow channel interface provided by the caller
//! (the secure transport itself - key exchange, encryption,
//! authentication - is an external collaborator) and drives one SCP role
//! per channel:
//!
//! ```text
//! Caller                 Engine                       Remote
//!    |                      |                            |
//!    |-- Session ---------->|                            |
//!    |                      |--- open + connect -------->|  Connector (retry)
//!    |                      |                            |
//!    |                      |<========== SCP ===========>|  upload / download
//!    |                      |     or shell commands      |  ShellRunner
//!    |                      |                            |
//!    |<-- progress lines ---|--- disconnect ------------>|  every exit path
//! ```
//!
//! All operations are synchronous and blocking on the calling thread;
//! only the connect phase has a timeout/retry policy. A channel is never
//! shared between logical operations.
//!
//! ## Quick Start
//!
//! ### Upload
//!
//! ```rust,ignore
//! use scpcore::{upload, ChannelKind, Connector, TransferConfig};
//! use std::path::Path;
//!
//! let connector = Connector::default();
//! let mut listener = |line: &str| eprint!("{line}");
//!
//! let mut channel = connector.connect(
//!     &session,
//!     &ChannelKind::scp_sink("/tmp/f.txt"),
//!     &mut listener,
//! )?;
//! let sent = upload(
//!     &mut channel,
//!     Path::new("f.txt"),
//!     &mut listener,
//!     &TransferConfig::default(),
//! )?;
//! ```
//!
//! ### Download
//!
//! ```rust,ignore
//! use scpcore::{download, ChannelKind};
//!
//! let mut channel = connector.connect(
//!     &session,
//!     &ChannelKind::scp_source("/var/log/syslog"),
//!     &mut listener,
//! )?;
//! let names = download(
//!     &mut channel,
//!     Path::new("./logs"),
//!     &mut listener,
//!     &TransferConfig::default(),
//! )?;
//! ```
//!
//! ### Shell sequence
//!
//! ```rust,ignore
//! use scpcore::{CommandStep, ShellRunner};
//! use regex::Regex;
//!
//! let runner = ShellRunner::default();
//! let steps = [
//!     CommandStep::with_expect("make install", "install complete"),
//!     CommandStep::new("exit"),
//! ];
//! let abort = Regex::new("^ERROR").unwrap();
//! runner.run(&session, &steps, Some(&abort), &mut listener)?;
//! ```
//!
//! ## Modules
//!
//! - [`channel`]: Session/Channel seam, connector, listener capability
//! - [`protocol`]: ack, header, and the sink/source drivers
//! - [`progress`]: throughput/ETA reporting
//! - [`shell`]: command sequences and escape stripping
//! - [`config`]: programmatic connect/transfer configuration
//! - [`error`]: error types and result alias

pub mod channel;
pub mod config;
pub mod error;
pub mod progress;
pub mod protocol;
pub mod shell;

// Re-exports for convenience
pub use channel::{Channel, ChannelKind, Connector, LineSink, RetryState, Session};
pub use config::{ConnectPolicy, TransferConfig};
pub use error::{Result, ScpError};
pub use progress::{format_progress, ProgressReporter, ProgressSnapshot, PROGRESS_INTERVAL};
pub use protocol::{download, read_ack, upload, Ack, FileHeader, DEFAULT_CHUNK_SIZE};
pub use shell::{strip_escapes, CommandStep, ShellRunner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
