//! The "run a command on a device" collaborator.
//!
//! Comparison logic never talks to devices directly; it asks a [`Transport`]
//! for the raw text of one command and treats every failure as final for the
//! current run.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

pub mod snapshot;
pub mod ssh;

pub use snapshot::SnapshotTransport;
pub use ssh::SshTransport;

/// A device address as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Transport failures. None are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("SSH timeout talking to {endpoint}: {detail}")]
    ConnectTimeout { endpoint: String, detail: String },
    #[error("authentication failed for {endpoint}: {detail}")]
    AuthFailure { endpoint: String, detail: String },
    #[error("transport error talking to {endpoint}: {detail}")]
    Transport { endpoint: String, detail: String },
}

/// Returns the raw multi-line output of `command` on `endpoint`.
pub trait Transport: Sync {
    fn fetch(
        &self,
        endpoint: &Endpoint,
        command: &str,
        timeout: Duration,
    ) -> Result<String, TransportError>;
}
