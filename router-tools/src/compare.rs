//! The three operator modes: NAT parity, NAT count, whole-config diff.

use std::time::Duration;

use router_diff_core::{
    build_index, count_nat_lines, diff_with_options, format_reconciliation_summary, format_summary,
    nat_lines, normalize, reconcile, DiffOptions, LineDiff, ParseError, PublicIndex,
    ReconciliationResult, ShadowedRecord, NAT_MATCH,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::fetch::{fetch_one, fetch_pair, DeviceFetch};
use crate::settings::{Settings, SettingsError};
use crate::transport::{Transport, TransportError};

pub const SHOW_RUNNING: &str = "show running-config";

const NAT_READ_TIMEOUT: Duration = Duration::from_secs(120);
const RUNNING_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Device command that lists only the static NAT lines.
pub fn nat_command() -> String {
    format!("{SHOW_RUNNING} | include {NAT_MATCH}")
}

/// Errors that stop a mode before it can report a comparison.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// A single-device mode could not reach its device.
    #[error("cannot fetch from {host}")]
    Fetch {
        host: String,
        #[source]
        source: TransportError,
    },
    /// At least one device of a pair failed; whatever did arrive is kept.
    #[error("comparison blocked: {host} unavailable")]
    Blocked {
        host: String,
        available: Vec<DeviceSummary>,
        #[source]
        source: TransportError,
    },
    #[error("static NAT table on {host} is malformed")]
    Malformed {
        host: String,
        #[source]
        source: ParseError,
    },
}

/// Per-router line of the operator report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub host: String,
    pub count: usize,
    pub elapsed_secs: f64,
}

impl DeviceSummary {
    fn new(fetch: &DeviceFetch, count: usize) -> Self {
        Self {
            host: fetch.endpoint.host.clone(),
            count,
            elapsed_secs: fetch.elapsed.as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatCountReport {
    pub router: DeviceSummary,
    pub match_prefix: &'static str,
}

/// A same-device duplicate public address, tagged with its router.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadowedEntry {
    pub host: String,
    #[serde(flatten)]
    pub record: ShadowedRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatParityReport {
    pub routers: [DeviceSummary; 2],
    pub match_prefix: &'static str,
    pub result: ReconciliationResult,
    pub shadowed: Vec<ShadowedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDiffReport {
    pub routers: [DeviceSummary; 2],
    pub from_label: String,
    pub to_label: String,
    pub diff: LineDiff,
}

/// Count static NAT lines on router 1 (or router 2 when `second` is set).
pub fn nat_count(
    transport: &dyn Transport,
    settings: &Settings,
    second: bool,
) -> Result<NatCountReport, CompareError> {
    let endpoint = if second {
        settings.pair()?[1]
    } else {
        &settings.router1
    };
    let fetch = fetch_one(
        transport,
        endpoint,
        &nat_command(),
        settings.read_timeout_or(NAT_READ_TIMEOUT),
    );
    let raw = fetch.outcome.as_ref().map_err(|err| CompareError::Fetch {
        host: fetch.endpoint.host.clone(),
        source: err.clone(),
    })?;

    Ok(NatCountReport {
        router: DeviceSummary::new(&fetch, count_nat_lines(raw)),
        match_prefix: NAT_MATCH,
    })
}

/// Reconcile the static NAT tables of both routers by public address.
pub fn nat_parity(
    transport: &dyn Transport,
    settings: &Settings,
) -> Result<NatParityReport, CompareError> {
    let fetches = fetch_pair(
        transport,
        settings.pair()?,
        &nat_command(),
        settings.read_timeout_or(NAT_READ_TIMEOUT),
    );
    let [lines_a, lines_b] = both_or_blocked(&fetches, nat_lines)?;
    let [fetch_a, fetch_b] = &fetches;

    let index_a = index_for(&fetch_a.endpoint.host, &lines_a)?;
    let index_b = index_for(&fetch_b.endpoint.host, &lines_b)?;

    let shadowed = [(fetch_a, &index_a), (fetch_b, &index_b)]
        .into_iter()
        .flat_map(|(fetch, index)| {
            index.shadowed().iter().map(move |record| ShadowedEntry {
                host: fetch.endpoint.host.clone(),
                record: record.clone(),
            })
        })
        .collect();

    let result = reconcile(&index_a, &index_b);
    info!(summary = %format_reconciliation_summary(&result), "reconciled");

    Ok(NatParityReport {
        routers: [
            DeviceSummary::new(fetch_a, lines_a.len()),
            DeviceSummary::new(fetch_b, lines_b.len()),
        ],
        match_prefix: NAT_MATCH,
        result,
        shadowed,
    })
}

/// Unified diff of both routers' normalized running configs.
pub fn config_diff(
    transport: &dyn Transport,
    settings: &Settings,
    opts: &DiffOptions,
) -> Result<ConfigDiffReport, CompareError> {
    let fetches = fetch_pair(
        transport,
        settings.pair()?,
        SHOW_RUNNING,
        settings.read_timeout_or(RUNNING_READ_TIMEOUT),
    );
    let [lines_a, lines_b] = both_or_blocked(&fetches, normalize)?;
    let [fetch_a, fetch_b] = &fetches;
    let diff = diff_with_options(&lines_a, &lines_b, opts);
    info!(summary = %format_summary(&diff), "diffed");

    Ok(ConfigDiffReport {
        routers: [
            DeviceSummary::new(fetch_a, lines_a.len()),
            DeviceSummary::new(fetch_b, lines_b.len()),
        ],
        from_label: format!("{}:running-config", fetch_a.endpoint.host),
        to_label: format!("{}:running-config", fetch_b.endpoint.host),
        diff,
    })
}

/// Apply `extract` to both outputs, or report the comparison as blocked.
///
/// Devices that did answer are summarized with their extracted item count.
fn both_or_blocked<T, F>(fetches: &[DeviceFetch; 2], extract: F) -> Result<[Vec<T>; 2], CompareError>
where
    F: Fn(&str) -> Vec<T>,
{
    let [a, b] = fetches;
    let summary = |fetch: &DeviceFetch, raw: &str| DeviceSummary::new(fetch, extract(raw).len());

    let (failed, source, available) = match (&a.outcome, &b.outcome) {
        (Ok(raw_a), Ok(raw_b)) => return Ok([extract(raw_a), extract(raw_b)]),
        (Err(err), Ok(raw_b)) => (a, err, vec![summary(b, raw_b)]),
        (Ok(raw_a), Err(err)) => (b, err, vec![summary(a, raw_a)]),
        (Err(err_a), Err(err_b)) => {
            warn!(host = %b.endpoint.host, err = %err_b, "second device also unavailable");
            (a, err_a, Vec::new())
        }
    };

    Err(CompareError::Blocked {
        host: failed.endpoint.host.clone(),
        available,
        source: source.clone(),
    })
}

fn index_for(host: &str, lines: &[String]) -> Result<PublicIndex, CompareError> {
    build_index(lines).map_err(|source| CompareError::Malformed {
        host: host.to_string(),
        source,
    })
}
