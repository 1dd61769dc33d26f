//! Engine configuration.
//!
//! All parameters are supplied programmatically by the caller; there is no
//! configuration file format. Defaults match the traditional `scp` client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connect retry policy for [`crate::channel::Connector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectPolicy {
    /// Maximum number of connect attempts before giving up.
    pub max_attempts: u32,
    /// Timeout for the first attempt.
    #[serde(with = "duration_secs")]
    pub initial_timeout: Duration,
    /// Added to the timeout after each failed attempt.
    #[serde(with = "duration_secs")]
    pub timeout_step: Duration,
}

impl Default for ConnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_timeout: Duration::from_secs(5),
            timeout_step: Duration::from_secs(5),
        }
    }
}

/// Per-transfer options for the upload and download drivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Payload chunk size in bytes.
    pub chunk_size: usize,
    /// Permission mode sent in upload headers (octal, e.g. `0o644`).
    pub file_mode: u32,
    /// Prefix progress lines with backspaces so terminals overwrite in
    /// place. Listeners that do not render terminal output may ignore the
    /// prefix.
    pub overwrite_progress: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: crate::protocol::DEFAULT_CHUNK_SIZE,
            file_mode: 0o644,
            overwrite_progress: true,
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.as_secs().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
