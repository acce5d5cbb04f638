//! Runtime configuration.

use anyhow::{Context, Result};
use serde::Deserialize;

/// The service name used for host/port lookups when `HPAACTION_NAME` is unset.
const DEFAULT_SERVICE_NAME: &str = "hpaaction";
/// The host advertised when `<SERVICE>_SERVICE_HOST` is unset.
const DEFAULT_SERVICE_HOST: &str = "localhost";
/// The port used when `<SERVICE>_SERVICE_PORT` is unset or unparseable.
const DEFAULT_SERVICE_PORT: u16 = 9042;

/// The TLS credential compiled in for development setups which enable TLS
/// without supplying a certificate.
const TEST_SERVER_CERT: &[u8] = include_bytes!("../testdata/server.pem");
const TEST_SERVER_KEY: &[u8] = include_bytes!("../testdata/server.key");

/// Runtime configuration data.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// The server's logging config, which uses Rust's `env_logger` directives.
    pub rust_log: String,

    /// TLS is enabled for the gRPC server when this value contains the substring `enable`.
    #[serde(default)]
    pub grpc_enable_tls: String,
    /// Path to the server's TLS certificate; empty selects the built-in test credential.
    #[serde(default)]
    pub grpc_server_cert: String,
    /// Path to the server's TLS private key; empty selects the built-in test credential.
    #[serde(default)]
    pub grpc_server_key: String,

    /// The name under which this controller is registered with the orchestrator.
    ///
    /// Drives the `<UPPER>_SERVICE_HOST` / `<UPPER>_SERVICE_PORT` environment lookups.
    #[serde(default = "default_service_name")]
    pub hpaaction_name: String,

    /// The path to the database on disk.
    #[serde(default = "crate::database::default_data_path")]
    pub storage_data_path: String,

    /// The host advertised for this controller's gRPC endpoint.
    ///
    /// This value is derived from the `hpaaction_name` value.
    #[serde(skip, default)]
    pub grpc_host: String,
    /// The port which the gRPC server listens on.
    ///
    /// This value is derived from the `hpaaction_name` value.
    #[serde(skip, default)]
    pub grpc_port: u16,
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

impl Config {
    /// Create a new config instance.
    ///
    /// Currently this routine just parses the runtime environment and builds the application
    /// config from that. In the future, this may take into account an optional config file as
    /// well.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Result<Self> {
        let mut config: Config = envy::from_env().context("error building config from env")?;
        let (host, port) = Self::service_host_port(&config.hpaaction_name);
        config.grpc_host = host;
        config.grpc_port = port;
        Ok(config)
    }

    /// Resolve the `<SERVICE>_SERVICE_HOST` / `<SERVICE>_SERVICE_PORT` pair for the given
    /// service name, falling back to the defaults used by local setups.
    pub fn service_host_port(service_name: &str) -> (String, u16) {
        let service = service_name.to_uppercase();
        let host = std::env::var(format!("{}_SERVICE_HOST", service))
            .ok()
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_HOST.to_string());
        let port = std::env::var(format!("{}_SERVICE_PORT", service))
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_SERVICE_PORT);
        (host, port)
    }

    /// Whether TLS is enabled for the gRPC server.
    pub fn tls_enabled(&self) -> bool {
        self.grpc_enable_tls.contains("enable")
    }

    /// The PEM-encoded certificate & private key for the gRPC server.
    ///
    /// Empty paths select the built-in test credential, matching the behavior operators
    /// expect from the other action controllers of the platform.
    pub fn tls_credentials(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let cert = if self.grpc_server_cert.is_empty() {
            TEST_SERVER_CERT.to_vec()
        } else {
            std::fs::read(&self.grpc_server_cert).with_context(|| format!("error reading TLS certificate from {}", &self.grpc_server_cert))?
        };
        let key = if self.grpc_server_key.is_empty() {
            TEST_SERVER_KEY.to_vec()
        } else {
            std::fs::read(&self.grpc_server_key).with_context(|| format!("error reading TLS private key from {}", &self.grpc_server_key))?
        };
        Ok((cert, key))
    }
}

#[cfg(test)]
impl Config {
    /// Create a config instance backed by a tempdir for testing.
    pub fn new_test() -> Result<(std::sync::Arc<Self>, tempfile::TempDir)> {
        let tmpdir = tempfile::tempdir().context("error creating tempdir")?;
        let config = Config {
            rust_log: "error".into(),
            grpc_enable_tls: String::new(),
            grpc_server_cert: String::new(),
            grpc_server_key: String::new(),
            hpaaction_name: DEFAULT_SERVICE_NAME.into(),
            storage_data_path: tmpdir.path().to_string_lossy().to_string(),
            grpc_host: DEFAULT_SERVICE_HOST.into(),
            grpc_port: DEFAULT_SERVICE_PORT,
        };
        Ok((std::sync::Arc::new(config), tmpdir))
    }
}
