//! Source-role download driver.
//!
//! Pulls one or more files from the remote source process
//! (`scp -f <path>`) into a local directory. The remote announces each
//! file with a `C`-record; the client acknowledges the header, copies
//! exactly the declared number of payload bytes, and acknowledges the
//! completed file. A clean end of stream at the control-byte position
//! ends the transfer; anything else that is not a `C`-record is an error.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::channel::{Channel, LineSink};
use crate::config::TransferConfig;
use crate::error::{Result, ScpError};
use crate::progress::ProgressReporter;
use crate::protocol::ack::{read_ack, read_diagnostic};
use crate::protocol::header::FileHeader;

/// Download all files offered by the connected source channel into
/// `local_dir`. Returns the names of the files written, in arrival order.
pub fn download<C: Channel>(
    channel: &mut C,
    local_dir: &Path,
    listener: &mut dyn LineSink,
    config: &TransferConfig,
) -> Result<Vec<String>> {
    let result = run_download(channel, local_dir, listener, config);
    channel.disconnect();
    match &result {
        Ok(names) => {
            tracing::info!(files = names.len(), dir = %local_dir.display(), "download complete");
        }
        Err(e) => tracing::warn!(dir = %local_dir.display(), error = %e, "download failed"),
    }
    result
}

fn run_download<C: Channel>(
    channel: &mut C,
    local_dir: &Path,
    listener: &mut dyn LineSink,
    config: &TransferConfig,
) -> Result<Vec<String>> {
    // Signal readiness to the source
    channel.write_all(&[0])?;
    channel.flush()?;

    let mut names = Vec::new();

    loop {
        let mut control = [0u8; 1];
        if channel.read(&mut control)? == 0 {
            // Clean end of the transfer sequence
            break;
        }

        match control[0] {
            b'C' => {}
            1 => {
                let message = read_diagnostic(channel)?;
                return Err(ScpError::Remote {
                    step: "control",
                    message,
                });
            }
            2 => {
                let message = read_diagnostic(channel)?;
                return Err(ScpError::RemoteFatal {
                    step: "control",
                    message,
                });
            }
            other => {
                // Includes D/E/T records: recursion is not supported, and
                // an unknown byte must never pass as success
                return Err(ScpError::RemoteFatal {
                    step: "control",
                    message: format!("unexpected control byte 0x{other:02x}"),
                });
            }
        }

        let header = FileHeader::read_after_control(channel)?;
        tracing::debug!(name = %header.name, size = header.size, "receiving file");

        channel.write_all(&[0])?;
        channel.flush()?;

        let dest = local_dir.join(&header.name);
        receive_payload(channel, &dest, header.size, listener, config)?;

        read_ack(channel)?.expect_ok("file")?;

        channel.write_all(&[0])?;
        channel.flush()?;

        names.push(header.name);
    }

    Ok(names)
}

fn receive_payload<C: Channel>(
    channel: &mut C,
    dest: &Path,
    size: u64,
    listener: &mut dyn LineSink,
    config: &TransferConfig,
) -> Result<()> {
    let mut file = File::create(dest)?;
    let mut buffer = vec![0u8; config.chunk_size];
    let mut reporter = ProgressReporter::new(listener, size, config.overwrite_progress);
    let mut received: u64 = 0;

    while received < size {
        let want = buffer.len().min((size - received) as usize);
        let n = channel.read(&mut buffer[..want])?;
        if n == 0 {
            return Err(ScpError::UnexpectedEof { step: "payload" });
        }
        file.write_all(&buffer[..n])?;
        received += n as u64;
        reporter.add(n as u64);
    }

    file.flush()?;
    reporter.finish();
    Ok(())
}
