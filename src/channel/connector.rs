//! Channel connection with bounded retry.
//!
//! Opens a channel on a session and connects it, retrying a bounded number
//! of times with a growing timeout. The retry arithmetic lives in a pure
//! [`RetryState`] transition function so it can be unit-tested without any
//! channel implementation.

use std::time::Duration;

use crate::channel::{Channel, ChannelKind, LineSink, Session};
use crate::config::ConnectPolicy;
use crate::error::{Result, ScpError};

/// Connect retry state machine.
///
/// | State        | Meaning                            | Transitions            |
/// |--------------|------------------------------------|------------------------|
/// | `Attempting` | about to try `connect(timeout)`    | → Attempting, Connected, Failed |
/// | `Connected`  | channel reported connected         | (terminal)             |
/// | `Failed`     | retry budget exhausted             | (terminal)             |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// About to make attempt number `attempt` (1-based) with `timeout`.
    Attempting {
        /// 1-based attempt counter.
        attempt: u32,
        /// Timeout for this attempt.
        timeout: Duration,
    },
    /// The channel connected.
    Connected,
    /// All attempts failed.
    Failed {
        /// Total attempts made.
        attempts: u32,
    },
}

impl RetryState {
    /// Initial state for a policy.
    pub fn start(policy: &ConnectPolicy) -> Self {
        RetryState::Attempting {
            attempt: 1,
            timeout: policy.initial_timeout,
        }
    }

    /// Pure transition: feed the outcome of the current attempt.
    pub fn step(self, connected: bool, policy: &ConnectPolicy) -> Self {
        match self {
            RetryState::Attempting { attempt, timeout } => {
                if connected {
                    RetryState::Connected
                } else if attempt >= policy.max_attempts {
                    RetryState::Failed { attempts: attempt }
                } else {
                    RetryState::Attempting {
                        attempt: attempt + 1,
                        timeout: timeout + policy.timeout_step,
                    }
                }
            }
            terminal => terminal,
        }
    }
}

/// Opens and connects channels according to a [`ConnectPolicy`].
#[derive(Debug, Clone, Default)]
pub struct Connector {
    policy: ConnectPolicy,
}

impl Connector {
    /// Create a connector with the given policy.
    pub fn new(policy: ConnectPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    pub fn policy(&self) -> &ConnectPolicy {
        &self.policy
    }

    /// Open a channel of `kind` on `session` and connect it.
    ///
    /// Emits one warning line per failed attempt and one informational
    /// line on success. Exhausting the retry budget is
    /// [`ScpError::Connection`]; a half-open channel is never returned.
    pub fn connect<S: Session>(
        &self,
        session: &S,
        kind: &ChannelKind,
        listener: &mut dyn LineSink,
    ) -> Result<S::Chan> {
        let mut channel = session.open_channel(kind)?;
        let mut state = RetryState::start(&self.policy);

        loop {
            match state {
                RetryState::Attempting { attempt, timeout } => {
                    let connected =
                        channel.connect(timeout).is_ok() && channel.is_connected();
                    if !connected {
                        tracing::warn!(
                            attempt,
                            max_attempts = self.policy.max_attempts,
                            timeout_secs = timeout.as_secs(),
                            "channel connect attempt failed"
                        );
                        listener.line(&format!(
                            "warning: connect attempt {attempt}/{} failed (timeout {}s)",
                            self.policy.max_attempts,
                            timeout.as_secs()
                        ));
                    }
                    state = state.step(connected, &self.policy);
                }
                RetryState::Connected => {
                    tracing::info!("channel connected");
                    listener.line("channel connected");
                    return Ok(channel);
                }
                RetryState::Failed { attempts } => {
                    return Err(ScpError::Connection { attempts });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    /// Channel whose first `fail_times` connect calls fail.
    #[derive(Debug)]
    struct FlakyChannel {
        fail_times: u32,
        calls: u32,
        connected: bool,
    }

    impl Read for FlakyChannel {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Ok(0)
        }
    }

    impl Write for FlakyChannel {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Channel for FlakyChannel {
        fn connect(&mut self, _timeout: Duration) -> std::io::Result<()> {
            self.calls += 1;
            if self.calls <= self.fail_times {
                Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connect timed out",
                ))
            } else {
                self.connected = true;
                Ok(())
            }
        }
        fn is_connected(&self) -> bool {
            self.connected
        }
        fn disconnect(&mut self) {
            self.connected = false;
        }
    }

    struct FlakySession {
        fail_times: u32,
    }

    impl Session for FlakySession {
        type Chan = FlakyChannel;
        fn open_channel(&self, _kind: &ChannelKind) -> std::io::Result<FlakyChannel> {
            Ok(FlakyChannel {
                fail_times: self.fail_times,
                calls: 0,
                connected: false,
            })
        }
    }

    fn collect_connect(fail_times: u32) -> (Result<FlakyChannel>, Vec<String>) {
        let session = FlakySession { fail_times };
        let connector = Connector::new(ConnectPolicy {
            max_attempts: 3,
            initial_timeout: Duration::from_secs(1),
            timeout_step: Duration::from_secs(1),
        });
        let mut lines = Vec::new();
        let result = connector.connect(&session, &ChannelKind::Shell, &mut |l: &str| {
            lines.push(l.to_string())
        });
        (result, lines)
    }

    #[test]
    fn test_connect_succeeds_after_two_failures() {
        let (result, lines) = collect_connect(2);
        let channel = result.unwrap();
        assert!(channel.is_connected());

        let warnings = lines.iter().filter(|l| l.starts_with("warning")).count();
        assert_eq!(warnings, 2);
        assert_eq!(lines.last().unwrap(), "channel connected");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_connect_exhausts_retries() {
        let (result, lines) = collect_connect(u32::MAX);
        match result {
            Err(ScpError::Connection { attempts }) => assert_eq!(attempts, 3),
            other => panic!("expected Connection error, got {other:?}"),
        }
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.starts_with("warning")));
    }

    #[test]
    fn test_retry_state_grows_timeout() {
        let policy = ConnectPolicy {
            max_attempts: 3,
            initial_timeout: Duration::from_secs(5),
            timeout_step: Duration::from_secs(5),
        };
        let s0 = RetryState::start(&policy);
        assert_eq!(
            s0,
            RetryState::Attempting {
                attempt: 1,
                timeout: Duration::from_secs(5)
            }
        );

        let s1 = s0.step(false, &policy);
        assert_eq!(
            s1,
            RetryState::Attempting {
                attempt: 2,
                timeout: Duration::from_secs(10)
            }
        );

        let s2 = s1.step(false, &policy);
        let s3 = s2.step(false, &policy);
        assert_eq!(s3, RetryState::Failed { attempts: 3 });
        // Terminal states are fixed points
        assert_eq!(s3.step(true, &policy), s3);
    }

    #[test]
    fn test_retry_state_connects_first_try() {
        let policy = ConnectPolicy::default();
        let state = RetryState::start(&policy).step(true, &policy);
        assert_eq!(state, RetryState::Connected);
    }
}
