// ── Client domain types ──

use serde::Serialize;

use super::mac::MacAddress;

/// A client the controller knows about, as fetched from the controller.
///
/// `id` and `mac` are missing on some controller records; such clients are
/// listed but cannot be renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub id: Option<String>,
    pub mac: Option<MacAddress>,
    /// Fixed or current IP, when the controller reports one.
    pub ip: Option<String>,
    /// Last IP the client was seen with.
    pub last_ip: Option<String>,
    /// Alias shown in the controller UI.
    pub name: Option<String>,
    pub hostname: Option<String>,
    pub note: Option<String>,
}

impl ClientRecord {
    pub fn new(id: impl Into<String>, mac: impl AsRef<str>) -> Self {
        Self {
            id: Some(id.into()),
            mac: Some(MacAddress::new(mac)),
            ip: None,
            last_ip: None,
            name: None,
            hostname: None,
            note: None,
        }
    }

    /// Best known address: the last seen IP wins over the configured one.
    pub fn best_ip(&self) -> Option<&str> {
        self.last_ip.as_deref().or(self.ip.as_deref())
    }
}

/// Normalized client listing returned to API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub id: Option<String>,
    pub mac: Option<MacAddress>,
    pub ip: Option<String>,
    pub name: Option<String>,
    pub hostname: Option<String>,
    pub note: Option<String>,
}

impl From<&ClientRecord> for ClientSummary {
    fn from(record: &ClientRecord) -> Self {
        Self {
            id: record.id.clone(),
            mac: record.mac.clone(),
            ip: record.best_ip().map(str::to_owned),
            name: record.name.clone(),
            hostname: record.hostname.clone(),
            note: record.note.clone(),
        }
    }
}
