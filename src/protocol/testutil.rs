//! Scripted channel fake shared by the protocol unit tests.

use std::io::{Cursor, Read, Write};
use std::time::Duration;

use crate::channel::{Channel, LineSink};

/// Listener that discards everything.
pub(crate) fn discard() -> impl LineSink {
    |_line: &str| {}
}

/// Channel that replays a pre-recorded remote byte stream and records
/// everything the driver writes.
pub(crate) struct ScriptedChannel {
    reply: Cursor<Vec<u8>>,
    written: Vec<u8>,
    connected: bool,
}

impl ScriptedChannel {
    /// Already-connected channel whose remote side will send `reply`.
    pub(crate) fn connected(reply: Vec<u8>) -> Self {
        Self {
            reply: Cursor::new(reply),
            written: Vec::new(),
            connected: true,
        }
    }

    /// Everything the driver wrote to the channel, in order.
    pub(crate) fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reply.read(buf)
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Channel for ScriptedChannel {
    fn connect(&mut self, _timeout: Duration) -> std::io::Result<()> {
        self.connected = true;
        Ok(())
    }
    fn is_connected(&self) -> bool {
        self.connected
    }
    fn disconnect(&mut self) {
        self.connected = false;
    }
}
