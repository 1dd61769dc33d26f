//! Fake session/channel peers shared by the end-to-end tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use std::time::Duration;

use scpcore::{Channel, ChannelKind, LineSink, Session};

/// Listener that discards everything.
pub fn discard() -> impl LineSink {
    |_line: &str| {}
}

/// Initialize test logging once; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Channel that replays a scripted remote byte stream and records each
/// write call separately, so tests can assert exact chunking.
#[derive(Debug)]
pub struct FakeChannel {
    reply: Cursor<Vec<u8>>,
    pub writes: Vec<Vec<u8>>,
    connected: bool,
    fail_connects: u32,
    pub disconnects: u32,
}

impl FakeChannel {
    pub fn new(reply: Vec<u8>, fail_connects: u32) -> Self {
        Self {
            reply: Cursor::new(reply),
            writes: Vec::new(),
            connected: false,
            fail_connects,
            disconnects: 0,
        }
    }

    /// All written bytes, concatenated.
    pub fn written(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl Read for FakeChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reply.read(buf)
    }
}

impl Write for FakeChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writes.push(buf.to_vec());
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Channel for FakeChannel {
    fn connect(&mut self, _timeout: Duration) -> std::io::Result<()> {
        if self.fail_connects > 0 {
            self.fail_connects -= 1;
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "connect timed out",
            ));
        }
        self.connected = true;
        Ok(())
    }
    fn is_connected(&self) -> bool {
        self.connected
    }
    fn disconnect(&mut self) {
        self.connected = false;
        self.disconnects += 1;
    }
}

/// Session handing out [`FakeChannel`]s and remembering the last opened
/// channel kind.
pub struct FakeSession {
    reply: Vec<u8>,
    fail_connects: u32,
    pub opened: RefCell<Vec<ChannelKind>>,
}

impl FakeSession {
    pub fn new(reply: Vec<u8>) -> Self {
        Self {
            reply,
            fail_connects: 0,
            opened: RefCell::new(Vec::new()),
        }
    }

    pub fn with_connect_failures(mut self, failures: u32) -> Self {
        self.fail_connects = failures;
        self
    }
}

impl Session for FakeSession {
    type Chan = FakeChannel;

    fn open_channel(&self, kind: &ChannelKind) -> std::io::Result<FakeChannel> {
        self.opened.borrow_mut().push(kind.clone());
        Ok(FakeChannel::new(self.reply.clone(), self.fail_connects))
    }
}
