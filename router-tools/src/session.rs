use anyhow::{Context, Result};
use router_tools::settings::Settings;
use router_tools::transport::{SnapshotTransport, SshTransport, Transport};

use crate::cli::GlobalArgs;

/// Validated settings plus the transport every mode fetches through.
pub struct Session {
    pub settings: Settings,
    transport: Box<dyn Transport>,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let settings = Settings::load(global.config.as_deref()).context("invalid settings")?;
        let transport: Box<dyn Transport> = match &global.snapshots {
            Some(dir) => Box::new(SnapshotTransport::new(dir)),
            None => Box::new(SshTransport::from_settings(&settings).context("invalid settings")?),
        };
        tracing::debug!(
            router1 = %settings.router1,
            device_type = %settings.device_type,
            snapshots = global.snapshots.is_some(),
            "session ready"
        );
        Ok(Self {
            settings,
            transport,
        })
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}
