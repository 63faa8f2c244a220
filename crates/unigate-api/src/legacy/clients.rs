// Legacy API known-client endpoints
//
// `list/user` returns every client the controller remembers; aliases are
// edited through `upd/user/{id}` rather than a full-object replace.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::KnownClient;

impl LegacyClient {
    /// List all known clients (users), connected or not.
    ///
    /// `GET /api/s/{site}/list/user`
    pub async fn list_known_clients(&self) -> Result<Vec<KnownClient>, Error> {
        let url = self.site_url("list/user")?;
        debug!("listing known clients");
        self.get(url).await
    }

    /// Set (or clear, with an empty string) a client's alias.
    ///
    /// `POST /api/s/{site}/upd/user/{id}` with `{"name": "..."}`
    pub async fn set_client_name(&self, client_id: &str, name: &str) -> Result<(), Error> {
        let url = self.site_object_url("upd/user", client_id)?;
        debug!(client_id, name, "renaming client");
        let _: Vec<serde_json::Value> = self.post(url, &json!({ "name": name })).await?;
        Ok(())
    }
}
