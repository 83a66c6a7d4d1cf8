//! Device fetches, one at a time or as a pair behind a join barrier.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::transport::{Endpoint, Transport, TransportError};

/// Result of running one command on one device.
#[derive(Debug, Clone)]
pub struct DeviceFetch {
    pub endpoint: Endpoint,
    pub outcome: Result<String, TransportError>,
    pub elapsed: Duration,
}

/// Run `command` on a single device.
pub fn fetch_one(
    transport: &dyn Transport,
    endpoint: &Endpoint,
    command: &str,
    timeout: Duration,
) -> DeviceFetch {
    info!(%endpoint, command, "fetching");
    let start = Instant::now();
    let outcome = transport.fetch(endpoint, command, timeout);
    let elapsed = start.elapsed();

    match &outcome {
        Ok(raw) => info!(%endpoint, bytes = raw.len(), ?elapsed, "fetched"),
        Err(err) => warn!(%endpoint, %err, ?elapsed, "fetch failed"),
    }

    DeviceFetch {
        endpoint: endpoint.clone(),
        outcome,
        elapsed,
    }
}

/// Run `command` on both devices concurrently and wait for both.
///
/// Each outcome is independent: one device failing never discards the
/// other's output.
pub fn fetch_pair(
    transport: &dyn Transport,
    endpoints: [&Endpoint; 2],
    command: &str,
    timeout: Duration,
) -> [DeviceFetch; 2] {
    let [first, second] = endpoints;
    thread::scope(|scope| {
        let handles = [first, second]
            .map(|endpoint| scope.spawn(move || fetch_one(transport, endpoint, command, timeout)));
        let [a, b] = handles;
        [join(a, first), join(b, second)]
    })
}

fn join(handle: thread::ScopedJoinHandle<'_, DeviceFetch>, endpoint: &Endpoint) -> DeviceFetch {
    handle.join().unwrap_or_else(|_| DeviceFetch {
        endpoint: endpoint.clone(),
        outcome: Err(TransportError::Transport {
            endpoint: endpoint.to_string(),
            detail: "fetch worker panicked".to_string(),
        }),
        elapsed: Duration::ZERO,
    })
}
