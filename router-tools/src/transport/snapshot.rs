use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use super::{Endpoint, Transport, TransportError};

const INCLUDE_PIPE: &str = "| include ";

/// Serves previously captured `show running-config` output from `<dir>/<host>.txt`.
///
/// A trailing `| include <text>` on the command is applied to the capture the
/// way the device would apply it, so the NAT modes work unchanged offline.
#[derive(Debug, Clone)]
pub struct SnapshotTransport {
    dir: PathBuf,
}

impl SnapshotTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn capture_path(&self, endpoint: &Endpoint) -> PathBuf {
        self.dir.join(format!("{}.txt", endpoint.host))
    }
}

impl Transport for SnapshotTransport {
    fn fetch(
        &self,
        endpoint: &Endpoint,
        command: &str,
        _timeout: Duration,
    ) -> Result<String, TransportError> {
        let path = self.capture_path(endpoint);
        debug!(path = %path.display(), command, "reading capture");
        let raw = fs::read_to_string(&path).map_err(|err| TransportError::Transport {
            endpoint: endpoint.to_string(),
            detail: format!("cannot read capture {}: {err}", path.display()),
        })?;

        Ok(match include_pattern(command) {
            Some(pattern) => raw
                .lines()
                .filter(|line| line.contains(pattern))
                .collect::<Vec<_>>()
                .join("\n"),
            None => raw,
        })
    }
}

fn include_pattern(command: &str) -> Option<&str> {
    command
        .split_once(INCLUDE_PIPE)
        .map(|(_, pattern)| pattern.trim())
        .filter(|pattern| !pattern.is_empty())
}
