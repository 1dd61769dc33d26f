//! Sink-role upload driver.
//!
//! Pushes one local file to the remote sink process (`scp -p -t <path>`)
//! over an exec channel the caller has already opened and connected.
//! Every step is gated on an OK acknowledgement; the channel is
//! disconnected on every exit path.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::channel::{Channel, LineSink};
use crate::config::TransferConfig;
use crate::error::{Result, ScpError};
use crate::progress::ProgressReporter;
use crate::protocol::ack::read_ack;
use crate::protocol::header::FileHeader;

/// Upload `local_file` over the connected sink channel.
///
/// Returns the number of payload bytes sent. The remote path was fixed
/// when the exec channel was opened (see
/// [`ChannelKind::scp_sink`](crate::channel::ChannelKind::scp_sink)); only
/// the file's base name travels in the transfer header.
pub fn upload<C: Channel>(
    channel: &mut C,
    local_file: &Path,
    listener: &mut dyn LineSink,
    config: &TransferConfig,
) -> Result<u64> {
    let result = run_upload(channel, local_file, listener, config);
    channel.disconnect();
    match &result {
        Ok(bytes) => tracing::info!(bytes, file = %local_file.display(), "upload complete"),
        Err(e) => tracing::warn!(file = %local_file.display(), error = %e, "upload failed"),
    }
    result
}

fn run_upload<C: Channel>(
    channel: &mut C,
    local_file: &Path,
    listener: &mut dyn LineSink,
    config: &TransferConfig,
) -> Result<u64> {
    read_ack(channel)?.expect_ok("handshake")?;

    let size = std::fs::metadata(local_file)?.len();
    let name = local_file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ScpError::InvalidHeader(format!("no usable base name: {}", local_file.display()))
        })?;
    let header = FileHeader::new(config.file_mode, size, name)?;

    channel.write_all(header.encode().as_bytes())?;
    channel.flush()?;
    read_ack(channel)?.expect_ok("header")?;

    tracing::debug!(name, size, mode = format!("{:04o}", header.mode), "header accepted");

    let mut file = File::open(local_file)?;
    let mut buffer = vec![0u8; config.chunk_size];
    let mut reporter = ProgressReporter::new(listener, size, config.overwrite_progress);
    let mut sent: u64 = 0;

    while sent < size {
        let want = buffer.len().min((size - sent) as usize);
        let n = file.read(&mut buffer[..want])?;
        if n == 0 {
            // Local file shrank underneath us; the declared size must hold
            return Err(ScpError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("local file truncated at {sent} of {size} bytes"),
            )));
        }
        channel.write_all(&buffer[..n])?;
        sent += n as u64;
        reporter.add(n as u64);
    }
    channel.flush()?;
    reporter.finish();

    read_ack(channel)?.expect_ok("payload")?;

    channel.write_all(&[0])?;
    channel.flush()?;
    read_ack(channel)?.expect_ok("terminator")?;

    Ok(sent)
}
