//! Live channel connection state machine.
//!
//! ```text
//! Disconnected -> Connecting -> Open -> RetryPending -> Connecting -> ...
//!                     \______________/
//!                     drop/error/close
//! ```
//!
//! `Terminated` is entered only through [`ChannelMachine::terminate`], which
//! the owner calls on unmount. A bounded [`RetryPolicy`] that runs out parks
//! the machine in `Disconnected`.

use crate::retry::RetryPolicy;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting { attempt: u32 },
    Open,
    RetryPending { attempt: u32, delay: Duration },
    Terminated,
}

impl ConnectionState {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting { .. } => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::RetryPending { .. } => "retry_pending",
            ConnectionState::Terminated => "terminated",
        }
    }

    /// A socket exists or is being negotiated.
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionState::Connecting { .. } | ConnectionState::Open)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("a connection is already {state}")]
    AlreadyActive { state: &'static str },

    #[error("channel is terminated")]
    Terminated,

    #[error("invalid transition from {from} on {event}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct ChannelMachine {
    state: ConnectionState,
    policy: RetryPolicy,
    /// Consecutive drops since the last successful open.
    failures: u32,
}

impl ChannelMachine {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            policy,
            failures: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Begin a connection attempt. Refuses while another socket is active,
    /// which keeps a widget at one connection.
    pub fn start_connect(&mut self) -> Result<u32, ChannelError> {
        match self.state {
            ConnectionState::Disconnected | ConnectionState::RetryPending { .. } => {
                let attempt = self.failures;
                self.state = ConnectionState::Connecting { attempt };
                Ok(attempt)
            }
            ConnectionState::Connecting { .. } | ConnectionState::Open => {
                Err(ChannelError::AlreadyActive {
                    state: self.state.name(),
                })
            }
            ConnectionState::Terminated => Err(ChannelError::Terminated),
        }
    }

    pub fn opened(&mut self) -> Result<(), ChannelError> {
        match self.state {
            ConnectionState::Connecting { .. } => {
                self.state = ConnectionState::Open;
                self.failures = 0;
                Ok(())
            }
            ConnectionState::Terminated => Err(ChannelError::Terminated),
            other => Err(ChannelError::InvalidTransition {
                from: other.name(),
                event: "opened",
            }),
        }
    }

    /// Record a close, error, or failed handshake. Returns the delay before
    /// the next attempt, or `None` when the retry policy is exhausted.
    pub fn dropped(&mut self) -> Result<Option<Duration>, ChannelError> {
        match self.state {
            ConnectionState::Connecting { .. } | ConnectionState::Open => {
                self.failures = self.failures.saturating_add(1);
                match self.policy.delay_for(self.failures) {
                    Some(delay) => {
                        self.state = ConnectionState::RetryPending {
                            attempt: self.failures,
                            delay,
                        };
                        Ok(Some(delay))
                    }
                    None => {
                        self.state = ConnectionState::Disconnected;
                        Ok(None)
                    }
                }
            }
            ConnectionState::Terminated => Err(ChannelError::Terminated),
            other => Err(ChannelError::InvalidTransition {
                from: other.name(),
                event: "dropped",
            }),
        }
    }

    pub fn terminate(&mut self) {
        self.state = ConnectionState::Terminated;
    }
}
