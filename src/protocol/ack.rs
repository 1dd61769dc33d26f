//! Acknowledgement byte handling.
//!
//! Every SCP protocol step is gated by a single-byte acknowledgement read
//! from the channel. Byte `0x00` means success; `0x01` and `0x02` are
//! followed by a newline-terminated diagnostic from the remote. The tagged
//! [`Ack`] variant replaces raw integer codes so a checkpoint can never
//! misinterpret an error byte as data.

use std::io::Read;

use crate::error::{Result, ScpError};

/// Outcome of reading one acknowledgement from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// `0x00` — the remote accepted the previous step.
    Ok,
    /// `0x01` — recoverable error, with the remote's diagnostic.
    Warning(String),
    /// `0x02` — fatal error, with the remote's diagnostic.
    Fatal(String),
    /// The stream ended where an ack byte was due.
    Eof,
}

impl Ack {
    /// Require this ack to be [`Ack::Ok`], converting anything else into
    /// the matching [`ScpError`] tagged with the protocol `step`.
    pub fn expect_ok(self, step: &'static str) -> Result<()> {
        match self {
            Ack::Ok => Ok(()),
            Ack::Warning(message) => Err(ScpError::Remote { step, message }),
            Ack::Fatal(message) => Err(ScpError::RemoteFatal { step, message }),
            Ack::Eof => Err(ScpError::UnexpectedEof { step }),
        }
    }
}

/// Read one acknowledgement from `reader`.
///
/// Bytes other than `0x00`/`0x01`/`0x02` are not valid SCP acks; they are
/// surfaced as [`Ack::Fatal`] carrying the raw byte value rather than
/// being silently skipped.
pub fn read_ack<R: Read + ?Sized>(reader: &mut R) -> Result<Ack> {
    let mut byte = [0u8; 1];
    if reader.read(&mut byte)? == 0 {
        return Ok(Ack::Eof);
    }

    match byte[0] {
        0 => Ok(Ack::Ok),
        1 => Ok(Ack::Warning(read_diagnostic(reader)?)),
        2 => Ok(Ack::Fatal(read_diagnostic(reader)?)),
        other => Ok(Ack::Fatal(format!("unexpected ack byte 0x{other:02x}"))),
    }
}

/// Read the remote's diagnostic message up to and including `\n`.
///
/// A stream that ends mid-message yields whatever was collected.
pub(crate) fn read_diagnostic<R: Read + ?Sized>(reader: &mut R) -> Result<String> {
    let mut message = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        if byte[0] == b'\n' {
            break;
        }
        message.push(byte[0]);
    }
    Ok(String::from_utf8_lossy(&message).into_owned())
}
