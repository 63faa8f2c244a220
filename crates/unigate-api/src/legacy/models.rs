// Legacy API response types
//
// Models for the UniFi controller's legacy JSON API. All responses are wrapped
// in the `LegacyResponse<T>` envelope. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence across firmware versions.
//
// WLAN objects are written back as a whole, so every type here keeps the
// fields it does not model in a flattened `extra` map.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// Every legacy endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── WLAN configuration ───────────────────────────────────────────────

/// WLAN configuration object from `rest/wlanconf`.
///
/// Dozens of radio and security fields ride along in `extra`; they are
/// sent back untouched when the object is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WlanConf {
    #[serde(rename = "_id")]
    pub id: String,
    /// SSID broadcast name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Default network (VLAN) for clients of this WLAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networkconf_id: Option<String>,
    #[serde(default)]
    pub private_preshared_keys: Vec<PpskKey>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of `private_preshared_keys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PpskKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networkconf_id: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Known client (user) ──────────────────────────────────────────────

/// Known client record from `list/user`.
///
/// Unlike `stat/sta`, this lists every client the controller remembers,
/// connected or not, including its alias (`name`) and `note`. Some records
/// come back without `_id` or `mac`; they still parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownClient {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub last_ip: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wlanconf_keeps_unmodelled_fields() {
        let raw = json!({
            "_id": "w1",
            "name": "Guest",
            "networkconf_id": "net1",
            "security": "wpapsk",
            "x_passphrase": "shared-secret",
            "private_preshared_keys": [
                { "password": "longpassword1", "networkconf_id": "net2", "extra_flag": true }
            ]
        });

        let wlan: WlanConf = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(wlan.private_preshared_keys.len(), 1);
        assert_eq!(wlan.extra.get("security"), Some(&json!("wpapsk")));

        let back = serde_json::to_value(&wlan).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn wlanconf_without_keys_defaults_to_empty() {
        let wlan: WlanConf = serde_json::from_value(json!({ "_id": "w2" })).unwrap();
        assert!(wlan.private_preshared_keys.is_empty());
        assert!(wlan.name.is_none());
    }

    #[test]
    fn known_client_optional_fields() {
        let client: KnownClient = serde_json::from_value(json!({
            "_id": "c1",
            "mac": "AA:BB:CC:DD:EE:FF",
            "last_ip": "10.0.0.5",
            "oui": "Apple"
        }))
        .unwrap();
        assert_eq!(client.last_ip.as_deref(), Some("10.0.0.5"));
        assert!(client.ip.is_none());
        assert!(client.extra.contains_key("oui"));
    }

    #[test]
    fn known_client_without_identity_still_parses() {
        let client: KnownClient =
            serde_json::from_value(json!({ "hostname": "ghost", "note": "" })).unwrap();
        assert!(client.id.is_none());
        assert!(client.mac.is_none());
    }
}
