// ── Controller session ──
//
// One authenticated session per controller identity. The platform is probed
// (or taken from config) on first use, the login happens lazily, and the
// session is reused until a call reveals the controller has dropped it.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use unigate_api::{LegacyClient, TlsMode, TransportConfig};

use crate::config::{ControllerConfig, TlsVerification};
use crate::error::CoreError;

/// Authenticated session against a single controller.
///
/// Share it behind an `Arc`; refreshes are serialized internally so
/// concurrent callers never log in twice for the same stale session.
pub struct ControllerSession {
    config: ControllerConfig,
    state: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    client: Option<Arc<LegacyClient>>,
    /// Set after a successful login; cleared when the controller rejects us.
    logged_in: bool,
}

impl SessionState {
    /// A session is usable when we logged in and the platform's session
    /// cookie is still in the jar.
    fn is_usable(&self) -> bool {
        self.logged_in
            && self
                .client
                .as_ref()
                .is_some_and(|client| client.has_session_cookie())
    }
}

impl ControllerSession {
    /// Create a session. Does NOT connect -- the first
    /// [`ensure_authenticated()`](Self::ensure_authenticated) does.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Return a client holding a valid session, logging in first if needed.
    ///
    /// Fails with [`CoreError::AuthenticationFailed`] when the controller is
    /// unreachable or rejects the credentials. Never retries.
    pub async fn ensure_authenticated(&self) -> Result<Arc<LegacyClient>, CoreError> {
        let mut state = self.state.lock().await;

        if state.is_usable() {
            if let Some(client) = &state.client {
                return Ok(Arc::clone(client));
            }
        }

        let client = match &state.client {
            Some(client) => Arc::clone(client),
            None => {
                let client = Arc::new(self.build_client().await?);
                state.client = Some(Arc::clone(&client));
                client
            }
        };

        state.logged_in = false;
        client
            .login(&self.config.username, &self.config.password)
            .await
            .map_err(|e| login_error(&e))?;
        state.logged_in = true;

        info!(
            controller = %client.base_url(),
            site = client.site(),
            platform = %client.platform(),
            version = %self.config.api_version,
            "controller session established"
        );
        Ok(client)
    }

    /// Mark the session stale so the next call logs in again.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if state.logged_in {
            debug!("invalidating controller session");
        }
        state.logged_in = false;
    }

    /// Whether a usable session is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_usable()
    }

    /// End the session on the controller, if one is held. Best-effort.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;
        if !state.logged_in {
            return;
        }
        state.logged_in = false;
        if let Some(client) = &state.client {
            if let Err(e) = client.logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
    }

    async fn build_client(&self) -> Result<LegacyClient, CoreError> {
        let transport = build_transport(&self.config);

        let platform = match self.config.platform {
            Some(platform) => platform,
            None => {
                let platform = LegacyClient::detect_platform(&self.config.url, &transport)
                    .await
                    .map_err(|e| login_error(&e))?;
                debug!(?platform, "detected controller platform");
                platform
            }
        };

        if self.config.password.expose_secret().is_empty() {
            warn!("controller password is empty; login will most likely fail");
        }

        LegacyClient::new(
            self.config.url.clone(),
            self.config.site.clone(),
            platform,
            &transport,
        )
        .map_err(|e| login_error(&e))
    }
}

/// Every failure while establishing a session is an authentication failure
/// from the caller's point of view, including an unreachable controller.
fn login_error(err: &unigate_api::Error) -> CoreError {
    let message = if err.is_unreachable() {
        format!("controller unreachable: {err}")
    } else {
        err.to_string()
    };
    CoreError::AuthenticationFailed { message }
}

/// Build a [`TransportConfig`] from the controller configuration.
fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        cookie_jar: None, // LegacyClient::new adds one automatically
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
