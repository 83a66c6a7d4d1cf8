//! Device endpoints, credentials and timeouts.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `ROUTER_*` environment variables (a `.env` file is loaded into
//! the environment by the binary before this runs). Blank values count as
//! unset.

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::Endpoint;

pub const ENV_HOST_1: &str = "ROUTER_HOST_1";
pub const ENV_HOST_2: &str = "ROUTER_HOST_2";
pub const ENV_USERNAME: &str = "ROUTER_USERNAME";
pub const ENV_PASSWORD: &str = "ROUTER_PASSWORD";
pub const ENV_KEY_FILE: &str = "ROUTER_KEY_FILE";
pub const ENV_DEVICE_TYPE: &str = "ROUTER_DEVICE_TYPE";
pub const ENV_PORT: &str = "ROUTER_PORT";
pub const ENV_CONNECT_TIMEOUT: &str = "ROUTER_CONNECT_TIMEOUT";
pub const ENV_READ_TIMEOUT: &str = "ROUTER_READ_TIMEOUT";

const DEFAULT_PORT: u16 = 22;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned while assembling [`Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// CLI flavour spoken by the devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    CiscoIos,
    CiscoXe,
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cisco_ios" => Ok(Self::CiscoIos),
            "cisco_xe" => Ok(Self::CiscoXe),
            other => Err(format!("unsupported device type '{other}'")),
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::CiscoIos => f.write_str("cisco_ios"),
            Self::CiscoXe => f.write_str("cisco_xe"),
        }
    }
}

/// On-disk form of the settings file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub router1: Option<String>,
    pub router2: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub key_file: Option<String>,
    pub device_type: Option<String>,
    pub port: Option<u16>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Validated settings, passed explicitly to every mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub router1: Endpoint,
    /// Only required by the two-device modes; see [`Settings::pair`].
    pub router2: Option<Endpoint>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Private key for public-key auth, used when no password is set.
    pub key_file: Option<PathBuf>,
    pub device_type: DeviceType,
    pub connect_timeout: Duration,
    /// Overrides the per-command read timeout when set.
    pub read_timeout: Option<Duration>,
}

impl Settings {
    /// Load from an optional TOML file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => SettingsFile::load(path)?,
            None => SettingsFile::default(),
        };
        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// Merge a settings file with an environment lookup (environment wins).
    pub fn from_sources<F>(file: SettingsFile, env: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str, fallback: Option<String>| non_blank(env(name)).or(non_blank(fallback));

        let port = match pick(ENV_PORT, file.port.map(|p| p.to_string())) {
            Some(raw) => parse_number::<u16>(ENV_PORT, &raw)?,
            None => DEFAULT_PORT,
        };
        if port == 0 {
            return Err(SettingsError::Invalid {
                name: ENV_PORT,
                value: "0".to_string(),
                reason: "port must be non-zero".to_string(),
            });
        }

        let device_type = match pick(ENV_DEVICE_TYPE, file.device_type) {
            Some(raw) => raw.parse::<DeviceType>().map_err(|reason| SettingsError::Invalid {
                name: ENV_DEVICE_TYPE,
                value: raw.clone(),
                reason,
            })?,
            None => DeviceType::default(),
        };

        let connect_timeout = match pick(ENV_CONNECT_TIMEOUT, file.connect_timeout_secs.map(|s| s.to_string())) {
            Some(raw) => Duration::from_secs(parse_number(ENV_CONNECT_TIMEOUT, &raw)?),
            None => DEFAULT_CONNECT_TIMEOUT,
        };
        let read_timeout = pick(ENV_READ_TIMEOUT, file.read_timeout_secs.map(|s| s.to_string()))
            .map(|raw| parse_number(ENV_READ_TIMEOUT, &raw).map(Duration::from_secs))
            .transpose()?;

        let router1 = pick(ENV_HOST_1, file.router1)
            .map(|host| Endpoint::new(host, port))
            .ok_or(SettingsError::Missing(ENV_HOST_1))?;
        let router2 = pick(ENV_HOST_2, file.router2).map(|host| Endpoint::new(host, port));

        Ok(Self {
            router1,
            router2,
            username: pick(ENV_USERNAME, file.username),
            password: pick(ENV_PASSWORD, file.password),
            key_file: pick(ENV_KEY_FILE, file.key_file).map(PathBuf::from),
            device_type,
            connect_timeout,
            read_timeout,
        })
    }

    /// Both endpoints, for the two-device modes.
    pub fn pair(&self) -> Result<[&Endpoint; 2], SettingsError> {
        let router2 = self
            .router2
            .as_ref()
            .ok_or(SettingsError::Missing(ENV_HOST_2))?;
        Ok([&self.router1, router2])
    }

    pub fn read_timeout_or(&self, default: Duration) -> Duration {
        self.read_timeout.unwrap_or(default)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse().map_err(|err: T::Err| SettingsError::Invalid {
        name,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}
