use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{Endpoint, Transport, TransportError};
use crate::settings::{Settings, SettingsError, ENV_PASSWORD, ENV_USERNAME};

/// How the session proves who it is.
#[derive(Clone)]
pub enum Credential {
    Password(String),
    KeyFile(PathBuf),
}

/// Runs device commands on an SSH exec channel.
///
/// Each fetch opens its own session on a single-threaded runtime, so the two
/// devices of a pair never share connection state. The connect timeout covers
/// the TCP connect, key exchange and authentication; the read timeout covers
/// the command until the device closes the channel.
#[derive(Clone)]
pub struct SshTransport {
    username: String,
    credential: Credential,
    connect_timeout: Duration,
}

impl SshTransport {
    /// A password wins over a key file when both are configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let username = settings
            .username
            .clone()
            .ok_or(SettingsError::Missing(ENV_USERNAME))?;
        let credential = match (&settings.password, &settings.key_file) {
            (Some(password), _) => Credential::Password(password.clone()),
            (None, Some(path)) => Credential::KeyFile(path.clone()),
            (None, None) => return Err(SettingsError::Missing(ENV_PASSWORD)),
        };
        Ok(Self {
            username,
            credential,
            connect_timeout: settings.connect_timeout,
        })
    }

    async fn open(&self, endpoint: &Endpoint) -> Result<Handle<DeviceHandler>, TransportError> {
        let config = Arc::new(client::Config::default());
        let handler = DeviceHandler {
            endpoint: endpoint.to_string(),
        };
        let mut handle = client::connect(config, (endpoint.host.as_str(), endpoint.port), handler)
            .await
            .map_err(|err| classify(endpoint, err))?;

        let accepted = match &self.credential {
            Credential::Password(password) => {
                handle
                    .authenticate_password(self.username.as_str(), password.as_str())
                    .await
            }
            Credential::KeyFile(path) => {
                let key = russh_keys::load_secret_key(path, None).map_err(|err| {
                    TransportError::Transport {
                        endpoint: endpoint.to_string(),
                        detail: format!("cannot load private key {}: {err}", path.display()),
                    }
                })?;
                handle
                    .authenticate_publickey(self.username.as_str(), Arc::new(key))
                    .await
            }
        }
        .map_err(|err| classify(endpoint, err))?;

        authenticated(endpoint, &self.username, accepted)?;
        debug!(%endpoint, username = %self.username, "ssh session authenticated");
        Ok(handle)
    }

    async fn fetch_async(
        &self,
        endpoint: &Endpoint,
        command: &str,
        read_timeout: Duration,
    ) -> Result<String, TransportError> {
        let handle = match timeout(self.connect_timeout, self.open(endpoint)).await {
            Ok(handle) => handle?,
            Err(_) => {
                return Err(TransportError::ConnectTimeout {
                    endpoint: endpoint.to_string(),
                    detail: format!(
                        "no authenticated session within {}s",
                        self.connect_timeout.as_secs()
                    ),
                })
            }
        };

        let output = match timeout(read_timeout, exec(&handle, command)).await {
            Ok(output) => output.map_err(|err| classify(endpoint, err))?,
            Err(_) => {
                warn!(%endpoint, command, "no complete response before deadline");
                return Err(TransportError::ConnectTimeout {
                    endpoint: endpoint.to_string(),
                    detail: format!("no complete response within {}s", read_timeout.as_secs()),
                });
            }
        };

        if let Err(err) = handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
        {
            debug!(%endpoint, error = %err, "ssh disconnect failed");
        }
        output.into_result(endpoint)
    }
}

impl Transport for SshTransport {
    fn fetch(
        &self,
        endpoint: &Endpoint,
        command: &str,
        timeout: Duration,
    ) -> Result<String, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| TransportError::Transport {
                endpoint: endpoint.to_string(),
                detail: format!("cannot start ssh runtime: {err}"),
            })?;
        debug!(%endpoint, command, "opening ssh session");
        runtime.block_on(self.fetch_async(endpoint, command, timeout))
    }
}

struct DeviceHandler {
    endpoint: String,
}

#[async_trait]
impl client::Handler for DeviceHandler {
    type Error = russh::Error;

    // Devices are addressed by operator-supplied hosts; the key is logged, not pinned.
    async fn check_server_key(
        &mut self,
        server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(
            endpoint = %self.endpoint,
            fingerprint = %server_public_key.fingerprint(),
            "accepting device host key"
        );
        Ok(true)
    }
}

/// Everything a device sent back on one exec channel.
#[derive(Debug, Default)]
struct ExecOutput {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_status: Option<u32>,
}

impl ExecOutput {
    fn into_result(self, endpoint: &Endpoint) -> Result<String, TransportError> {
        match self.exit_status {
            Some(code) if code != 0 => {
                let stderr = String::from_utf8_lossy(&self.stderr);
                let detail = stderr
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .last()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("command exited with status {code}"));
                Err(TransportError::Transport {
                    endpoint: endpoint.to_string(),
                    detail,
                })
            }
            _ => Ok(String::from_utf8_lossy(&self.stdout).into_owned()),
        }
    }
}

// Exec channels get no pty, so the device writes the whole output unpaged.
async fn exec(handle: &Handle<DeviceHandler>, command: &str) -> Result<ExecOutput, russh::Error> {
    let mut channel = handle.channel_open_session().await?;
    channel.exec(true, command).await?;

    let mut output = ExecOutput::default();
    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => output.stdout.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, .. } => output.stderr.extend_from_slice(data),
            ChannelMsg::ExitStatus { exit_status } => output.exit_status = Some(exit_status),
            _ => {}
        }
    }
    Ok(output)
}

fn authenticated(endpoint: &Endpoint, username: &str, accepted: bool) -> Result<(), TransportError> {
    if accepted {
        return Ok(());
    }
    Err(TransportError::AuthFailure {
        endpoint: endpoint.to_string(),
        detail: format!("device rejected credentials for user {username}"),
    })
}

fn classify(endpoint: &Endpoint, err: russh::Error) -> TransportError {
    let endpoint = endpoint.to_string();
    match err {
        russh::Error::IO(io) if io.kind() == ErrorKind::TimedOut => {
            TransportError::ConnectTimeout {
                endpoint,
                detail: io.to_string(),
            }
        }
        russh::Error::NotAuthenticated => TransportError::AuthFailure {
            endpoint,
            detail: "not authenticated".to_string(),
        },
        other => TransportError::Transport {
            endpoint,
            detail: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::net::TcpListener;
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{authenticated, classify, Credential, ExecOutput, SshTransport};
    use crate::settings::{Settings, SettingsError, SettingsFile};
    use crate::transport::{Endpoint, Transport, TransportError};

    fn endpoint() -> Endpoint {
        Endpoint::new("198.51.100.1", 2222)
    }

    fn transport(connect_timeout: Duration) -> SshTransport {
        SshTransport {
            username: "netops".to_string(),
            credential: Credential::Password("secret".to_string()),
            connect_timeout,
        }
    }

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_sources(SettingsFile::default(), move |name| {
            pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
        })
        .expect("settings")
    }

    #[test]
    fn credentials_prefer_password_then_key_file() {
        let both = settings(&[
            ("ROUTER_HOST_1", "r1"),
            ("ROUTER_USERNAME", "netops"),
            ("ROUTER_PASSWORD", "secret"),
            ("ROUTER_KEY_FILE", "/keys/id_ed25519"),
        ]);
        let ssh = SshTransport::from_settings(&both).expect("transport");
        assert!(matches!(ssh.credential, Credential::Password(ref p) if p == "secret"));

        let key_only = settings(&[
            ("ROUTER_HOST_1", "r1"),
            ("ROUTER_USERNAME", "netops"),
            ("ROUTER_KEY_FILE", "/keys/id_ed25519"),
        ]);
        let ssh = SshTransport::from_settings(&key_only).expect("transport");
        assert!(
            matches!(ssh.credential, Credential::KeyFile(ref p) if p == &PathBuf::from("/keys/id_ed25519"))
        );
    }

    #[test]
    fn missing_username_or_credential_is_a_settings_error() {
        let no_user = settings(&[("ROUTER_HOST_1", "r1"), ("ROUTER_PASSWORD", "secret")]);
        assert!(matches!(
            SshTransport::from_settings(&no_user),
            Err(SettingsError::Missing("ROUTER_USERNAME"))
        ));

        let no_secret = settings(&[("ROUTER_HOST_1", "r1"), ("ROUTER_USERNAME", "netops")]);
        assert!(matches!(
            SshTransport::from_settings(&no_secret),
            Err(SettingsError::Missing("ROUTER_PASSWORD"))
        ));
    }

    #[test]
    fn rejected_credentials_are_an_auth_failure() {
        assert_eq!(authenticated(&endpoint(), "netops", true), Ok(()));
        assert_eq!(
            authenticated(&endpoint(), "netops", false),
            Err(TransportError::AuthFailure {
                endpoint: "198.51.100.1:2222".to_string(),
                detail: "device rejected credentials for user netops".to_string(),
            })
        );
    }

    #[test]
    fn classifies_protocol_errors() {
        let ep = endpoint();
        let timed_out = russh::Error::IO(io::Error::new(io::ErrorKind::TimedOut, "connect timed out"));
        assert!(matches!(classify(&ep, timed_out), TransportError::ConnectTimeout { .. }));
        assert!(matches!(
            classify(&ep, russh::Error::NotAuthenticated),
            TransportError::AuthFailure { .. }
        ));
        let refused = russh::Error::IO(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(classify(&ep, refused), TransportError::Transport { .. }));
    }

    #[test]
    fn non_zero_exit_reports_last_stderr_line() {
        let failed = ExecOutput {
            stdout: b"partial".to_vec(),
            stderr: b"\n% Invalid input detected at '^' marker.\n\n".to_vec(),
            exit_status: Some(1),
        };
        assert_eq!(
            failed.into_result(&endpoint()),
            Err(TransportError::Transport {
                endpoint: "198.51.100.1:2222".to_string(),
                detail: "% Invalid input detected at '^' marker.".to_string(),
            })
        );

        let ok = ExecOutput {
            stdout: b"hostname r1\n".to_vec(),
            stderr: Vec::new(),
            exit_status: None,
        };
        assert_eq!(ok.into_result(&endpoint()), Ok("hostname r1\n".to_string()));
    }

    #[test]
    fn silent_server_hits_the_connect_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        thread::spawn(move || {
            // Accept and never speak, holding the socket open.
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(5));
                drop(stream);
            }
        });

        let started = Instant::now();
        let err = transport(Duration::from_millis(300))
            .fetch(&Endpoint::new("127.0.0.1", port), "show running-config", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, TransportError::ConnectTimeout { .. }), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn closed_port_is_a_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let err = transport(Duration::from_secs(5))
            .fetch(&Endpoint::new("127.0.0.1", port), "show running-config", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, TransportError::Transport { .. }), "{err:?}");
    }
}
