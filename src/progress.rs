//! Throughput and ETA reporting for transfer copy loops.
//!
//! A [`ProgressReporter`] is owned by exactly one copy loop for the
//! duration of one transfer. It counts bytes as chunks complete and emits
//! one human-readable line each time the cumulative total crosses a new
//! 1-MiB boundary. Transfers that never cross a boundary stay silent.

use std::time::Instant;

use serde::Serialize;

use crate::channel::LineSink;

/// Bytes between progress lines (1 MiB).
pub const PROGRESS_INTERVAL: u64 = 1024 * 1024;

/// Point-in-time view of a running transfer.
///
/// Serializable so embedding applications can forward it to a UI.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressSnapshot {
    /// Bytes transferred so far.
    pub bytes_transferred: u64,
    /// Total bytes expected.
    pub total_bytes: u64,
    /// Milliseconds since the copy loop started (never zero).
    pub elapsed_ms: u64,
    /// Last whole-MiB boundary that was reported.
    pub reported_mib: u64,
}

impl ProgressSnapshot {
    /// Throughput in kilobytes per second.
    pub fn rate_kbps(&self) -> f64 {
        (self.bytes_transferred as f64 / self.elapsed_ms as f64) * (1000.0 / 1024.0)
    }

    /// Estimated milliseconds remaining.
    pub fn eta_ms(&self) -> u64 {
        if self.bytes_transferred == 0 {
            return 0;
        }
        let projected = (self.elapsed_ms as f64 / self.bytes_transferred as f64)
            * self.total_bytes as f64
            - self.elapsed_ms as f64;
        if projected > 0.0 {
            projected as u64
        } else {
            0
        }
    }
}

/// Format one progress line from a snapshot.
pub fn format_progress(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{} MB of {:.1} MB copied ({:.1} KB/s, ETA {}s)",
        snapshot.reported_mib,
        snapshot.total_bytes as f64 / PROGRESS_INTERVAL as f64,
        snapshot.rate_kbps(),
        snapshot.eta_ms() / 1000
    )
}

/// Emits periodic throughput/ETA lines while a copy loop runs.
pub struct ProgressReporter<'a> {
    listener: &'a mut dyn LineSink,
    total: u64,
    bytes: u64,
    started: Instant,
    reported_mib: u64,
    last_len: usize,
    emitted: bool,
    overwrite: bool,
}

impl<'a> ProgressReporter<'a> {
    /// Start a reporter for a transfer of `total` bytes.
    ///
    /// When `overwrite` is set, each line after the first is prefixed with
    /// backspace characters matching the previous line's length so a
    /// terminal overwrites in place. Listeners that do not render terminal
    /// output may ignore the prefix.
    pub fn new(listener: &'a mut dyn LineSink, total: u64, overwrite: bool) -> Self {
        Self {
            listener,
            total,
            bytes: 0,
            started: Instant::now(),
            reported_mib: 0,
            last_len: 0,
            emitted: false,
            overwrite,
        }
    }

    /// Account for one completed chunk of `n` bytes.
    pub fn add(&mut self, n: u64) {
        self.bytes += n;
        let mib = self.bytes / PROGRESS_INTERVAL;
        if mib > self.reported_mib {
            self.reported_mib = mib;
            self.report();
        }
    }

    /// Current snapshot of the transfer.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            bytes_transferred: self.bytes,
            total_bytes: self.total,
            elapsed_ms: (self.started.elapsed().as_millis() as u64).max(1),
            reported_mib: self.reported_mib,
        }
    }

    /// Emit the trailing newline, if any progress line was emitted.
    pub fn finish(&mut self) {
        if self.emitted {
            self.listener.line("\n");
        }
    }

    fn report(&mut self) {
        let message = format_progress(&self.snapshot());
        if self.overwrite && self.last_len > 0 {
            let erase: String = "\u{8}".repeat(self.last_len);
            self.listener.line(&format!("{erase}{message}"));
        } else {
            self.listener.line(&message);
        }
        self.last_len = message.len();
        self.emitted = true;
    }
}
