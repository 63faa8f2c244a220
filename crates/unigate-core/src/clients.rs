// ── Client directory ──
//
// Normalized view of the controller's known clients and alias changes keyed
// by MAC address.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::CoreError;
use crate::gateway::ControllerGateway;
use crate::model::{ClientSummary, MacAddress};

pub struct ClientDirectory {
    gateway: Arc<dyn ControllerGateway>,
}

impl ClientDirectory {
    pub fn new(gateway: Arc<dyn ControllerGateway>) -> Self {
        Self { gateway }
    }

    /// Every known client, with `ip` preferring the last seen address.
    pub async fn list_clients(&self) -> Result<Vec<ClientSummary>, CoreError> {
        let clients = self.gateway.fetch_clients().await?;
        Ok(clients.iter().map(ClientSummary::from).collect())
    }

    /// Set the alias of the client with this MAC.
    ///
    /// Returns `Ok(false)` when no known client has the MAC. Records without
    /// an id or MAC never match.
    pub async fn rename_by_mac(&self, mac: &str, alias: &str) -> Result<bool, CoreError> {
        if alias.is_empty() {
            return Err(CoreError::validation("alias is required"));
        }
        let mac = MacAddress::new(mac);

        let clients = self.gateway.fetch_clients().await?;
        let target = clients.iter().find_map(|client| match (&client.id, &client.mac) {
            (Some(id), Some(client_mac)) if *client_mac == mac => Some(id),
            _ => None,
        });
        let Some(client_id) = target else {
            debug!(%mac, "no known client with this MAC");
            return Ok(false);
        };

        let updated = self.gateway.rename_client(client_id, alias).await?;
        info!(%mac, %client_id, "client alias updated");
        Ok(updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::InMemoryGateway;
    use crate::model::ClientRecord;
    use pretty_assertions::assert_eq;

    fn directory_with(gateway: InMemoryGateway) -> (Arc<InMemoryGateway>, ClientDirectory) {
        let gateway = Arc::new(gateway);
        let directory = ClientDirectory::new(Arc::clone(&gateway) as Arc<dyn ControllerGateway>);
        (gateway, directory)
    }

    fn laptop() -> ClientRecord {
        let mut client = ClientRecord::new("c1", "AA:BB:CC:DD:EE:FF");
        client.ip = Some("10.0.0.4".into());
        client.last_ip = Some("10.0.0.9".into());
        client.hostname = Some("laptop.lan".into());
        client
    }

    #[tokio::test]
    async fn list_prefers_last_ip() {
        let mut printer = ClientRecord::new("c2", "11:22:33:44:55:66");
        printer.ip = Some("10.0.0.50".into());
        let (_, directory) =
            directory_with(InMemoryGateway::new().with_client(laptop()).with_client(printer));

        let listed = directory.list_clients().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].ip.as_deref(), Some("10.0.0.9"));
        assert_eq!(listed[0].mac.as_ref().unwrap().as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(listed[1].ip.as_deref(), Some("10.0.0.50"));
        assert!(listed[1].name.is_none());
    }

    #[tokio::test]
    async fn rename_matches_mac_case_insensitively() {
        let (gateway, directory) = directory_with(InMemoryGateway::new().with_client(laptop()));

        let updated = directory
            .rename_by_mac(" aa:bb:cc:DD:ee:ff ", "Work Laptop")
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(
            gateway.client("c1").unwrap().name.as_deref(),
            Some("Work Laptop")
        );
    }

    #[tokio::test]
    async fn records_without_identity_are_listed_but_never_renamed() {
        let mut ghost = ClientRecord::new("c9", "aa:bb:cc:dd:ee:ff");
        ghost.id = None;
        ghost.hostname = Some("ghost".into());
        let mut anonymous = ClientRecord::new("c8", "unused");
        anonymous.mac = None;
        let (gateway, directory) = directory_with(
            InMemoryGateway::new()
                .with_client(ghost)
                .with_client(anonymous)
                .with_client(laptop()),
        );

        let listed = directory.list_clients().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].id.is_none());
        assert!(listed[1].mac.is_none());

        let updated = directory
            .rename_by_mac("aa:bb:cc:dd:ee:ff", "Work Laptop")
            .await
            .unwrap();
        assert!(updated);
        assert_eq!(gateway.renames(), 1);
        assert_eq!(
            gateway.client("c1").unwrap().name.as_deref(),
            Some("Work Laptop")
        );
    }

    #[tokio::test]
    async fn rename_unknown_mac_returns_false() {
        let (gateway, directory) = directory_with(InMemoryGateway::new().with_client(laptop()));

        let updated = directory
            .rename_by_mac("00:00:00:00:00:01", "Ghost")
            .await
            .unwrap();

        assert!(!updated);
        assert_eq!(gateway.renames(), 0);
    }

    #[tokio::test]
    async fn rename_rejects_empty_alias() {
        let (gateway, directory) = directory_with(InMemoryGateway::new().with_client(laptop()));

        let err = directory
            .rename_by_mac("aa:bb:cc:dd:ee:ff", "")
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(gateway.renames(), 0);
    }

    #[tokio::test]
    async fn rename_failure_is_remote_error() {
        let (gateway, directory) = directory_with(InMemoryGateway::new().with_client(laptop()));
        gateway.fail_writes(true);

        let result = directory.rename_by_mac("aa:bb:cc:dd:ee:ff", "Work").await;

        assert!(matches!(result, Err(CoreError::Remote { .. })));
    }
}
