// ── Runtime connection configuration ──
//
// These types describe *how* to reach a UniFi controller. They carry
// credential data and connection tuning, but never touch disk.
// `unigate-config` builds a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use unigate_api::ControllerPlatform;
use url::Url;

/// Controller API version assumed when none is configured.
pub const DEFAULT_API_VERSION: &str = "9.0.0";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one controller identity.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://192.168.1.1`).
    pub url: Url,
    /// Site to operate on (defaults to "default").
    pub site: String,
    pub username: String,
    pub password: SecretString,
    /// Controller software version the gateway is configured against.
    pub api_version: String,
    pub tls: TlsVerification,
    /// Pin the platform instead of probing for it on first login.
    pub platform: Option<ControllerPlatform>,
    /// Per-request timeout applied to every controller call.
    pub timeout: Duration,
}

impl ControllerConfig {
    /// Config with the stock defaults: site `default`, strict TLS, platform
    /// auto-detection, 30 second timeout.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            site: "default".into(),
            username: username.into(),
            password,
            api_version: DEFAULT_API_VERSION.into(),
            tls: TlsVerification::default(),
            platform: None,
            timeout: Duration::from_secs(30),
        }
    }
}
