// ── API-to-domain type conversions ──
//
// Bridges raw `unigate_api` legacy models into the domain types and back.
// WLAN conversions are lossless in both directions so a replace never drops
// controller fields.

use unigate_api::legacy::models::{KnownClient, PpskKey, WlanConf};

use crate::model::{ClientRecord, MacAddress, PpskEntry, WlanConfig};

impl From<WlanConf> for WlanConfig {
    fn from(raw: WlanConf) -> Self {
        Self {
            id: raw.id,
            ssid: raw.name,
            default_network_id: raw.networkconf_id,
            ppsks: raw
                .private_preshared_keys
                .into_iter()
                .map(PpskEntry::from)
                .collect(),
            extra: raw.extra,
        }
    }
}

impl From<WlanConfig> for WlanConf {
    fn from(wlan: WlanConfig) -> Self {
        Self {
            id: wlan.id,
            name: wlan.ssid,
            networkconf_id: wlan.default_network_id,
            private_preshared_keys: wlan.ppsks.into_iter().map(PpskKey::from).collect(),
            extra: wlan.extra,
        }
    }
}

impl From<PpskKey> for PpskEntry {
    fn from(raw: PpskKey) -> Self {
        Self {
            password: raw.password,
            network_id: raw.networkconf_id,
            extra: raw.extra,
        }
    }
}

impl From<PpskEntry> for PpskKey {
    fn from(entry: PpskEntry) -> Self {
        Self {
            password: entry.password,
            networkconf_id: entry.network_id,
            extra: entry.extra,
        }
    }
}

impl From<KnownClient> for ClientRecord {
    fn from(raw: KnownClient) -> Self {
        Self {
            id: raw.id,
            mac: raw.mac.as_deref().map(MacAddress::new),
            ip: raw.ip,
            last_ip: raw.last_ip,
            name: raw.name,
            hostname: raw.hostname,
            note: raw.note,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wlan_round_trip_is_lossless() {
        let raw = json!({
            "_id": "w1",
            "name": "Guest",
            "networkconf_id": "net1",
            "security": "wpapsk",
            "minrate_ng_enabled": false,
            "private_preshared_keys": [
                { "password": "longpassword1", "networkconf_id": "net2", "vendor": 7 }
            ]
        });

        let wlan = WlanConfig::from(serde_json::from_value::<WlanConf>(raw.clone()).unwrap());
        assert_eq!(wlan.ssid.as_deref(), Some("Guest"));
        assert_eq!(wlan.ppsks[0].network_id.as_deref(), Some("net2"));

        let back = serde_json::to_value(WlanConf::from(wlan)).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn known_client_mac_is_normalized() {
        let raw: KnownClient = serde_json::from_value(json!({
            "_id": "c1",
            "mac": "AA:BB:CC:DD:EE:FF",
            "ip": "10.0.0.4"
        }))
        .unwrap();

        let record = ClientRecord::from(raw);
        assert_eq!(record.mac.as_ref().unwrap().as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(record.best_ip(), Some("10.0.0.4"));
    }

    #[test]
    fn known_client_without_mac_keeps_remaining_fields() {
        let raw: KnownClient =
            serde_json::from_value(json!({ "_id": "c2", "hostname": "ghost" })).unwrap();

        let record = ClientRecord::from(raw);
        assert_eq!(record.id.as_deref(), Some("c2"));
        assert!(record.mac.is_none());
        assert_eq!(record.hostname.as_deref(), Some("ghost"));
    }
}
