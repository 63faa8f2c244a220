// Legacy API WLAN configuration endpoints
//
// The controller exposes no partial update for a WLAN: the whole object is
// read from `rest/wlanconf` and written back with a PUT.

use tracing::debug;

use crate::error::Error;
use crate::legacy::client::LegacyClient;
use crate::legacy::models::WlanConf;

impl LegacyClient {
    /// List every WLAN configuration on the site.
    ///
    /// `GET /api/s/{site}/rest/wlanconf`
    pub async fn list_wlan_configs(&self) -> Result<Vec<WlanConf>, Error> {
        let url = self.site_url("rest/wlanconf")?;
        debug!("listing WLAN configurations");
        self.get(url).await
    }

    /// Replace a WLAN configuration with the given object.
    ///
    /// `PUT /api/s/{site}/rest/wlanconf/{id}`
    pub async fn update_wlan_config(&self, wlan_id: &str, wlan: &WlanConf) -> Result<(), Error> {
        let url = self.site_object_url("rest/wlanconf", wlan_id)?;
        debug!(wlan_id, keys = wlan.private_preshared_keys.len(), "replacing WLAN configuration");
        let _: Vec<serde_json::Value> = self.put(url, wlan).await?;
        Ok(())
    }
}
