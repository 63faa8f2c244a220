// ── WLAN and PPSK domain types ──

use serde::Serialize;

/// Full snapshot of a WLAN configuration.
///
/// `extra` holds every controller field not modelled here; it is written
/// back verbatim when the WLAN is replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct WlanConfig {
    pub id: String,
    pub ssid: Option<String>,
    /// Network assigned to PPSKs that do not name their own.
    pub default_network_id: Option<String>,
    pub ppsks: Vec<PpskEntry>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WlanConfig {
    pub fn new(id: impl Into<String>, ssid: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ssid: Some(ssid.into()),
            default_network_id: None,
            ppsks: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_default_network(mut self, network_id: impl Into<String>) -> Self {
        self.default_network_id = Some(network_id.into());
        self
    }

    pub fn with_ppsk(mut self, entry: PpskEntry) -> Self {
        self.ppsks.push(entry);
        self
    }

    /// Whether an entry with exactly this password exists.
    pub fn has_password(&self, password: &str) -> bool {
        self.ppsks
            .iter()
            .any(|entry| entry.password.as_deref() == Some(password))
    }
}

/// One private pre-shared key. The password is its only identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PpskEntry {
    pub password: Option<String>,
    pub network_id: Option<String>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PpskEntry {
    pub fn new(password: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            network_id: Some(network_id.into()),
            extra: serde_json::Map::new(),
        }
    }
}

/// A PPSK flattened out of its WLAN for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PpskDescriptor {
    pub wlan_id: String,
    pub ssid: Option<String>,
    pub password: Option<String>,
    pub networkconf_id: Option<String>,
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPpsk {
    pub wlan_id: String,
    pub ssid: Option<String>,
    pub password: String,
    pub networkconf_id: String,
    pub created: bool,
}

/// Result of a remove. `removed == 0` is a normal outcome, explained by `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalResult {
    pub wlan_id: String,
    pub removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
