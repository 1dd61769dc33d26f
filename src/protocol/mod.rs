//! SCP sub-protocol drivers.
//!
//! Implements the client side of both SCP roles over an already-connected
//! exec channel: upload (the remote runs the sink, `scp -p -t`) and
//! download (the remote runs the source, `scp -f`).
//!
//! # Wire Format
//!
//! Acknowledgement bytes gate every step:
//!
//! | Byte   | Meaning                                             |
//! |--------|-----------------------------------------------------|
//! | `0x00` | OK                                                  |
//! | `0x01` | recoverable error, `\n`-terminated message follows  |
//! | `0x02` | fatal error, `\n`-terminated message follows        |
//! | (EOF)  | abnormal termination                                |
//!
//! Each file is announced by a header record:
//!
//! ```text
//! C<4-digit-octal-mode> <decimal-size> <basename>\n
//! ```
//!
//! followed by exactly `<decimal-size>` payload bytes and a single `0x00`
//! end-of-data marker.
//!
//! ## Upload sequence
//!
//! ```text
//! Client (sink role driver)             Remote (scp -p -t <path>)
//!    |                                     |
//!    |<------------- 0x00 ----------------|  handshake ack
//!    |-- C0644 <size> <name>\n ----------->|
//!    |<------------- 0x00 ----------------|  header ack
//!    |============ payload ==============>|  <size> bytes, 4 KiB chunks
//!    |<------------- 0x00 ----------------|  payload ack
//!    |-------------- 0x00 --------------->|  end-of-data marker
//!    |<------------- 0x00 ----------------|  final ack
//! ```
//!
//! ## Download sequence
//!
//! ```text
//! Client (source role driver)           Remote (scp -f <path>)
//!    |-------------- 0x00 --------------->|  ready
//!    |<-- C0644 <size> <name>\n ----------|  per file
//!    |-------------- 0x00 --------------->|  header ack
//!    |<=========== payload ===============|  <size> bytes
//!    |<------------- 0x00 ----------------|  source's OK
//!    |-------------- 0x00 --------------->|  file ack
//!    |              (repeat, then EOF)    |
//! ```
//!
//! The ordering is strict: no step may be skipped or reordered, and the
//! declared size exactly bounds the payload phase in both directions.

mod ack;
mod download;
mod header;
mod upload;

#[cfg(test)]
pub(crate) mod testutil;

pub use ack::{read_ack, Ack};
pub use download::download;
pub use header::FileHeader;
pub use upload::upload;

/// Payload chunk size used by the reference `scp` client (4 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 4096;
