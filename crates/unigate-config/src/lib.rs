//! Configuration for the unigate server.
//!
//! Settings are layered with figment, lowest precedence first: built-in
//! defaults, an optional TOML file, then environment variables. The
//! environment uses the variable names deployments already set
//! (`UNIFI_BASE`, `UNIFI_USER`, `API_BEARER_TOKEN`, ...). Credentials are
//! wrapped in [`SecretString`] as soon as they leave this crate.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use unigate_core::config::DEFAULT_API_VERSION;
use unigate_core::{ControllerConfig, ControllerPlatform, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ── Settings structs ────────────────────────────────────────────────

/// Everything the server needs, as loaded. Secrets are still plain
/// strings here; use [`Settings::controller_config`] and
/// [`Settings::server_config`] to get the runtime types.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub controller: ControllerSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// `[controller]` section, overridden by `UNIFI_*` variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerSettings {
    /// Controller base URL (`UNIFI_BASE`).
    #[serde(default, deserialize_with = "scalar_string")]
    pub base: String,

    #[serde(default = "default_site", deserialize_with = "scalar_string")]
    pub site: String,

    #[serde(default, deserialize_with = "scalar_string")]
    pub user: String,

    #[serde(default, deserialize_with = "scalar_string")]
    pub pass: String,

    /// Controller software version (`UNIFI_VERSION`).
    #[serde(default = "default_version", deserialize_with = "scalar_string")]
    pub version: String,

    /// Accepts `1`/`0`, `true`/`false`, `on`/`off` and `yes`/`no`.
    #[serde(default = "default_verify_ssl", deserialize_with = "lenient_bool")]
    pub verify_ssl: bool,

    /// Custom CA bundle; only consulted when `verify_ssl` is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// `unifi-os`, `classic`, or unset to detect on first login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            base: String::new(),
            site: default_site(),
            user: String::new(),
            pass: String::new(),
            version: default_version(),
            verify_ssl: default_verify_ssl(),
            ca_cert: None,
            timeout: default_timeout(),
            platform: None,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Listen address (`UNIGATE_LISTEN`).
    #[serde(default = "default_listen", deserialize_with = "scalar_string")]
    pub listen: String,

    /// Bearer token clients must present (`API_BEARER_TOKEN`). Empty
    /// rejects every authenticated route.
    #[serde(default, deserialize_with = "scalar_string")]
    pub bearer_token: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            bearer_token: String::new(),
        }
    }
}

fn default_site() -> String {
    "default".into()
}
fn default_version() -> String {
    DEFAULT_API_VERSION.into()
}
fn default_verify_ssl() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// Environment values are parsed as TOML scalars, so a numeric password
/// arrives as an integer. Accept any scalar and keep its text.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Signed(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// Boolean switch as deployments write it in the environment. Integers
/// arrive as numbers, words as strings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Switch {
        Bool(bool),
        Signed(i64),
        Unsigned(u64),
        Text(String),
    }

    match Switch::deserialize(deserializer)? {
        Switch::Bool(b) => Ok(b),
        Switch::Signed(n) => int_switch(n.into()),
        Switch::Unsigned(n) => int_switch(n.into()),
        Switch::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" | "" => Ok(false),
            _ => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&s),
                &"a boolean (true/false, 1/0, on/off, yes/no)",
            )),
        },
    }
}

fn int_switch<E: serde::de::Error>(n: i128) -> Result<bool, E> {
    match n {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(E::custom(format!("expected 0 or 1, found {n}"))),
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// The figment used by [`load`], exposed for callers that want to merge
/// extra providers on top.
pub fn figment(path: Option<&Path>) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));

    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::prefixed("UNIFI_").map(|key| format!("controller.{key}").into()))
        .merge(
            Env::prefixed("UNIGATE_")
                .only(&["listen"])
                .map(|key| format!("server.{key}").into()),
        )
        .merge(
            Env::raw()
                .only(&["API_BEARER_TOKEN"])
                .map(|_| "server.bearer_token".into()),
        )
}

/// Load settings from defaults, the optional TOML file, and the environment.
///
/// An explicitly named file must exist.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(figment(path).extract()?)
}

// ── Runtime translation ─────────────────────────────────────────────

/// Server-side settings in runtime form.
#[derive(Debug)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub bearer_token: SecretString,
}

impl Settings {
    /// Build the controller connection config, validating the URL and
    /// credentials.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let c = &self.controller;

        if c.base.trim().is_empty() {
            return Err(ConfigError::invalid("controller.base", "UNIFI_BASE is not set"));
        }
        let url: url::Url = c
            .base
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid("controller.base", format!("{e}: {}", c.base)))?;

        if c.user.trim().is_empty() {
            return Err(ConfigError::invalid("controller.user", "UNIFI_USER is not set"));
        }
        if c.timeout == 0 {
            return Err(ConfigError::invalid("controller.timeout", "must be at least 1 second"));
        }

        let platform = match c.platform.as_deref().map(str::trim) {
            None | Some("" | "auto") => None,
            Some(raw) => Some(
                raw.parse::<ControllerPlatform>()
                    .map_err(|e| ConfigError::invalid("controller.platform", e))?,
            ),
        };

        let tls = if !c.verify_ssl {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca) = c.ca_cert {
            TlsVerification::CustomCa(ca.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let mut config = ControllerConfig::new(
            url,
            c.user.trim(),
            SecretString::from(c.pass.clone()),
        );
        if !c.site.trim().is_empty() {
            config.site = c.site.trim().to_owned();
        }
        if !c.version.trim().is_empty() {
            config.api_version = c.version.trim().to_owned();
        }
        config.tls = tls;
        config.platform = platform;
        config.timeout = Duration::from_secs(c.timeout);

        Ok(config)
    }

    /// Parse the listen address and wrap the bearer token.
    pub fn server_config(&self) -> Result<ServerConfig, ConfigError> {
        let listen = self
            .server
            .listen
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid("server.listen", format!("{e}: {}", self.server.listen)))?;

        Ok(ServerConfig {
            listen,
            bearer_token: SecretString::from(self.server.bearer_token.trim().to_owned()),
        })
    }

    /// Effective settings as TOML, with secrets masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        mask(&mut shown.controller.pass);
        mask(&mut shown.server.bearer_token);
        Ok(toml::to_string_pretty(&shown)?)
    }
}

fn mask(secret: &mut String) {
    if !secret.is_empty() {
        *secret = "********".into();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let settings = load(None).map_err(|e| e.to_string())?;

            assert_eq!(settings.controller.site, "default");
            assert_eq!(settings.controller.version, "9.0.0");
            assert!(settings.controller.verify_ssl);
            assert_eq!(settings.controller.timeout, 30);
            assert_eq!(settings.server.listen, "0.0.0.0:8080");
            assert!(settings.server.bearer_token.is_empty());
            Ok(())
        });
    }

    #[test]
    fn environment_uses_deployment_variable_names() {
        Jail::expect_with(|jail| {
            jail.set_env("UNIFI_BASE", "https://192.168.1.1");
            jail.set_env("UNIFI_SITE", "branch");
            jail.set_env("UNIFI_USER", "admin");
            jail.set_env("UNIFI_PASS", "12345678");
            jail.set_env("UNIFI_VERIFY_SSL", "false");
            jail.set_env("API_BEARER_TOKEN", "s3cret");
            jail.set_env("UNIGATE_LISTEN", "127.0.0.1:9000");

            let settings = load(None).map_err(|e| e.to_string())?;
            let controller = settings.controller_config().map_err(|e| e.to_string())?;
            let server = settings.server_config().map_err(|e| e.to_string())?;

            assert_eq!(controller.url.as_str(), "https://192.168.1.1/");
            assert_eq!(controller.site, "branch");
            assert_eq!(controller.username, "admin");
            assert_eq!(controller.password.expose_secret(), "12345678");
            assert_eq!(controller.tls, TlsVerification::DangerAcceptInvalid);
            assert_eq!(server.listen, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
            assert_eq!(server.bearer_token.expose_secret(), "s3cret");
            Ok(())
        });
    }

    #[test]
    fn verify_ssl_accepts_switch_spellings() {
        let cases = [
            ("0", false),
            ("1", true),
            ("off", false),
            ("no", false),
            ("yes", true),
            ("On", true),
            ("FALSE", false),
        ];
        for (raw, expected) in cases {
            Jail::expect_with(|jail| {
                jail.set_env("UNIFI_VERIFY_SSL", raw);
                let settings = load(None).map_err(|e| e.to_string())?;
                assert_eq!(settings.controller.verify_ssl, expected, "UNIFI_VERIFY_SSL={raw}");
                Ok(())
            });
        }
    }

    #[test]
    fn verify_ssl_rejects_other_values() {
        Jail::expect_with(|jail| {
            jail.set_env("UNIFI_VERIFY_SSL", "maybe");
            assert!(matches!(load(None), Err(ConfigError::Figment(_))));

            jail.set_env("UNIFI_VERIFY_SSL", "2");
            assert!(matches!(load(None), Err(ConfigError::Figment(_))));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "unigate.toml",
                r#"
                    [controller]
                    base = "https://controller.lan:8443"
                    user = "file-user"
                    pass = "file-pass"
                    platform = "classic"
                    timeout = 10

                    [server]
                    listen = "127.0.0.1:8081"
                    bearer_token = "from-file"
                "#,
            )?;
            jail.set_env("UNIFI_USER", "env-user");
            jail.set_env("API_BEARER_TOKEN", "from-env");

            let settings = load(Some(Path::new("unigate.toml"))).map_err(|e| e.to_string())?;
            let controller = settings.controller_config().map_err(|e| e.to_string())?;

            assert_eq!(controller.username, "env-user");
            assert_eq!(controller.password.expose_secret(), "file-pass");
            assert_eq!(controller.platform, Some(ControllerPlatform::ClassicController));
            assert_eq!(controller.timeout, Duration::from_secs(10));
            assert_eq!(controller.tls, TlsVerification::SystemDefaults);
            assert_eq!(settings.server.listen, "127.0.0.1:8081");
            assert_eq!(settings.server.bearer_token, "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = load(Some(Path::new("nope.toml")));
            assert!(matches!(err, Err(ConfigError::MissingFile { .. })));
            Ok(())
        });
    }

    #[test]
    fn base_url_and_user_are_required() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.controller_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "controller.base"
        ));

        settings.controller.base = "not a url".into();
        assert!(settings.controller_config().is_err());

        settings.controller.base = "https://192.168.1.1".into();
        assert!(matches!(
            settings.controller_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "controller.user"
        ));

        settings.controller.user = "admin".into();
        assert!(settings.controller_config().is_ok());
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let mut settings = Settings::default();
        settings.controller.base = "https://192.168.1.1".into();
        settings.controller.user = "admin".into();
        settings.controller.platform = Some("cloudkey-9000".into());

        assert!(settings.controller_config().is_err());

        settings.controller.platform = Some("auto".into());
        assert!(settings.controller_config().unwrap().platform.is_none());
    }

    #[test]
    fn redacted_toml_hides_secrets() {
        let mut settings = Settings::default();
        settings.controller.pass = "hunter22".into();
        settings.server.bearer_token = "token".into();

        let rendered = settings.to_redacted_toml().unwrap();

        assert!(!rendered.contains("hunter22"));
        assert!(!rendered.contains("\"token\""));
        assert!(rendered.contains("********"));
    }
}
