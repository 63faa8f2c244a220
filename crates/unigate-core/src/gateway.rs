// ── Controller gateway ──
//
// Typed call surface over the controller's legacy API. Every operation
// authenticates first; an authentication failure mid-call invalidates the
// session so the next operation logs in again. Nothing is retried here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{ClientRecord, WlanConfig};
use crate::session::ControllerSession;

/// The four controller operations the managers are built on.
#[async_trait]
pub trait ControllerGateway: Send + Sync {
    /// All WLANs, in the order the controller returns them.
    async fn fetch_wlans(&self) -> Result<Vec<WlanConfig>, CoreError>;

    /// Replace a WLAN with the given snapshot in one write.
    async fn replace_wlan(&self, wlan_id: &str, wlan: &WlanConfig) -> Result<bool, CoreError>;

    /// Every client the controller knows about.
    async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, CoreError>;

    async fn rename_client(&self, client_id: &str, name: &str) -> Result<bool, CoreError>;
}

/// [`ControllerGateway`] backed by a live [`ControllerSession`].
pub struct LegacyGateway {
    session: Arc<ControllerSession>,
}

impl LegacyGateway {
    pub fn new(session: Arc<ControllerSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<ControllerSession> {
        &self.session
    }

    /// Convert an api-layer result, dropping the session when the
    /// controller says it is no longer valid.
    async fn settle<T: Send>(
        &self,
        result: Result<T, unigate_api::Error>,
    ) -> Result<T, CoreError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_auth_expired() {
                    warn!(error = %e, "controller rejected session");
                    self.session.invalidate().await;
                }
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl ControllerGateway for LegacyGateway {
    async fn fetch_wlans(&self) -> Result<Vec<WlanConfig>, CoreError> {
        let client = self.session.ensure_authenticated().await?;
        let raw = self.settle(client.list_wlan_configs().await).await?;
        debug!(count = raw.len(), "fetched WLANs");
        Ok(raw.into_iter().map(WlanConfig::from).collect())
    }

    async fn replace_wlan(&self, wlan_id: &str, wlan: &WlanConfig) -> Result<bool, CoreError> {
        let client = self.session.ensure_authenticated().await?;
        let body = unigate_api::legacy::models::WlanConf::from(wlan.clone());
        self.settle(client.update_wlan_config(wlan_id, &body).await)
            .await?;
        Ok(true)
    }

    async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, CoreError> {
        let client = self.session.ensure_authenticated().await?;
        let raw = self.settle(client.list_known_clients().await).await?;
        debug!(count = raw.len(), "fetched known clients");
        Ok(raw.into_iter().map(ClientRecord::from).collect())
    }

    async fn rename_client(&self, client_id: &str, name: &str) -> Result<bool, CoreError> {
        let client = self.session.ensure_authenticated().await?;
        self.settle(client.set_client_name(client_id, name).await)
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use serde_json::json;
    use unigate_api::ControllerPlatform;
    use url::Url;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::ControllerConfig;

    fn gateway_for(server: &MockServer, platform: Option<ControllerPlatform>) -> LegacyGateway {
        let mut config = ControllerConfig::new(
            Url::parse(&server.uri()).unwrap(),
            "admin",
            SecretString::from("hunter22".to_string()),
        );
        config.platform = platform;
        LegacyGateway::new(Arc::new(ControllerSession::new(config)))
    }

    fn envelope(data: serde_json::Value) -> serde_json::Value {
        json!({ "meta": { "rc": "ok" }, "data": data })
    }

    async fn mount_unifi_os_login(server: &MockServer, expected: u64) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", "TOKEN=jwt; Path=/")
                    .insert_header("X-CSRF-Token", "csrf-1")
                    .set_body_json(json!({})),
            )
            .expect(expected)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn unifi_os_session_is_shared_across_calls() {
        let server = MockServer::start().await;
        mount_unifi_os_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/proxy/network/api/s/default/rest/wlanconf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                { "_id": "w1", "name": "Guest", "networkconf_id": "net1" }
            ]))))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/proxy/network/api/s/default/list/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
                { "_id": "c1", "mac": "AA:BB:CC:DD:EE:FF", "ip": "10.0.0.2" }
            ]))))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some(ControllerPlatform::UnifiOs));
        let wlans = gateway.fetch_wlans().await.unwrap();
        let clients = gateway.fetch_clients().await.unwrap();

        assert_eq!(wlans.len(), 1);
        assert_eq!(wlans[0].default_network_id.as_deref(), Some("net1"));
        assert_eq!(clients[0].mac.as_ref().unwrap().as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[tokio::test]
    async fn replace_preserves_unmodelled_fields() {
        let server = MockServer::start().await;
        mount_unifi_os_login(&server, 1).await;

        let raw = json!({
            "_id": "w1",
            "name": "Guest",
            "networkconf_id": "net1",
            "x_passphrase": "shared-secret",
            "private_preshared_keys": [
                { "password": "longpassword1", "networkconf_id": "net1" }
            ]
        });
        Mock::given(method("GET"))
            .and(path("/proxy/network/api/s/default/rest/wlanconf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([raw.clone()]))))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/proxy/network/api/s/default/rest/wlanconf/w1"))
            .and(body_json(&raw))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some(ControllerPlatform::UnifiOs));
        let wlan = gateway.fetch_wlans().await.unwrap().remove(0);

        assert!(gateway.replace_wlan("w1", &wlan).await.unwrap());
    }

    #[tokio::test]
    async fn rejected_session_is_invalidated_and_renewed() {
        let server = MockServer::start().await;
        mount_unifi_os_login(&server, 2).await;
        Mock::given(method("GET"))
            .and(path("/proxy/network/api/s/default/list/user"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/proxy/network/api/s/default/list/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some(ControllerPlatform::UnifiOs));

        let first = gateway.fetch_clients().await;
        assert!(matches!(first, Err(CoreError::AuthenticationFailed { .. })));
        assert!(!gateway.session().is_authenticated().await);

        let second = gateway.fetch_clients().await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn remote_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", "unifises=s1; Path=/")
                    .set_body_json(envelope(json!([]))),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/s/default/upd/user/c1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some(ControllerPlatform::ClassicController));
        let result = gateway.rename_client("c1", "Printer").await;

        assert!(matches!(result, Err(CoreError::Remote { .. })));
        // A server error is not an auth problem; the session survives.
        assert!(gateway.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn login_failure_surfaces_before_any_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/s/default/rest/wlanconf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some(ControllerPlatform::ClassicController));
        let result = gateway.fetch_wlans().await;

        assert!(matches!(
            result,
            Err(CoreError::AuthenticationFailed { .. })
        ));
    }
}
