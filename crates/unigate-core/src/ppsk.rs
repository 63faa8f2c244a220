// ── PPSK management ──
//
// Private pre-shared keys live inside the WLAN object, so every mutation is
// fetch snapshot → edit local copy → replace the whole WLAN. Mutations on the
// same WLAN id are serialized within the process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::gateway::ControllerGateway;
use crate::model::{CreatedPpsk, PpskDescriptor, PpskEntry, RemovalResult, WlanConfig};

/// WPA2 passphrase bounds, in characters.
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 63;

const NO_MATCH_MESSAGE: &str = "No PPSK matched the provided password";

pub struct PpskManager {
    gateway: Arc<dyn ControllerGateway>,
    wlan_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PpskManager {
    pub fn new(gateway: Arc<dyn ControllerGateway>) -> Self {
        Self {
            gateway,
            wlan_locks: DashMap::new(),
        }
    }

    /// Flatten the PPSKs of every WLAN, optionally narrowed to one WLAN id
    /// (exact) and/or one SSID (case-insensitive). Empty filters match all.
    pub async fn list_ppsks(
        &self,
        wlan_filter: Option<&str>,
        ssid_filter: Option<&str>,
    ) -> Result<Vec<PpskDescriptor>, CoreError> {
        let wlan_filter = wlan_filter.filter(|f| !f.is_empty());
        let ssid_filter = ssid_filter.filter(|f| !f.is_empty());

        let wlans = self.gateway.fetch_wlans().await?;

        let descriptors: Vec<PpskDescriptor> = wlans
            .iter()
            .filter(|wlan| wlan_filter.is_none_or(|id| wlan.id == id))
            .filter(|wlan| {
                ssid_filter.is_none_or(|ssid| {
                    wlan.ssid
                        .as_deref()
                        .unwrap_or_default()
                        .eq_ignore_ascii_case(ssid)
                })
            })
            .flat_map(|wlan| {
                wlan.ppsks.iter().map(move |entry| PpskDescriptor {
                    wlan_id: wlan.id.clone(),
                    ssid: wlan.ssid.clone(),
                    password: entry.password.clone(),
                    networkconf_id: entry
                        .network_id
                        .clone()
                        .or_else(|| wlan.default_network_id.clone()),
                })
            })
            .collect();

        debug!(count = descriptors.len(), "listed PPSKs");
        Ok(descriptors)
    }

    /// Add a PPSK to a WLAN.
    ///
    /// The password is trimmed and must be 8-63 characters; this is checked
    /// before the controller is contacted. The network defaults to the
    /// WLAN's own network when `network_id` is absent or empty.
    pub async fn create_ppsk(
        &self,
        wlan_id: &str,
        password: &str,
        network_id: Option<&str>,
    ) -> Result<CreatedPpsk, CoreError> {
        let password = password.trim();
        let len = password.chars().count();
        if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
            return Err(CoreError::validation("Password must be 8-63 characters."));
        }

        let _guard = self.lock_wlan(wlan_id).await;

        let mut wlan = self.find_wlan(wlan_id).await?;

        if wlan.has_password(password) {
            return Err(CoreError::Conflict {
                message: "PPSK password already exists on this WLAN.".into(),
            });
        }

        let network = network_id
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .or_else(|| wlan.default_network_id.clone().filter(|id| !id.is_empty()))
            .ok_or_else(|| {
                CoreError::validation("networkconf_id must be provided or present on WLAN.")
            })?;

        wlan.ppsks.push(PpskEntry::new(password, network.clone()));
        self.gateway.replace_wlan(wlan_id, &wlan).await?;

        info!(wlan_id, network = %network, "PPSK created");
        Ok(CreatedPpsk {
            wlan_id: wlan_id.to_owned(),
            ssid: wlan.ssid,
            password: password.to_owned(),
            networkconf_id: network,
            created: true,
        })
    }

    /// Remove every PPSK on the WLAN whose password matches exactly after
    /// trimming, the same normalization `create_ppsk` applies.
    ///
    /// No match is a normal outcome: `removed` is 0 and nothing is written.
    pub async fn remove_ppsk(
        &self,
        wlan_id: &str,
        password: &str,
    ) -> Result<RemovalResult, CoreError> {
        let password = password.trim();
        let _guard = self.lock_wlan(wlan_id).await;

        let mut wlan = self.find_wlan(wlan_id).await?;

        let before = wlan.ppsks.len();
        wlan.ppsks
            .retain(|entry| entry.password.as_deref() != Some(password));
        let removed = before - wlan.ppsks.len();

        if removed == 0 {
            debug!(wlan_id, "no PPSK matched for removal");
            return Ok(RemovalResult {
                wlan_id: wlan_id.to_owned(),
                removed: 0,
                message: Some(NO_MATCH_MESSAGE.into()),
            });
        }

        self.gateway.replace_wlan(wlan_id, &wlan).await?;

        info!(wlan_id, removed, "PPSK removed");
        Ok(RemovalResult {
            wlan_id: wlan_id.to_owned(),
            removed,
            message: None,
        })
    }

    async fn find_wlan(&self, wlan_id: &str) -> Result<WlanConfig, CoreError> {
        self.gateway
            .fetch_wlans()
            .await?
            .into_iter()
            .find(|wlan| wlan.id == wlan_id)
            .ok_or_else(|| CoreError::WlanNotFound {
                wlan_id: wlan_id.to_owned(),
            })
    }

    /// Serialize mutations on one WLAN. The map entry is dropped again once
    /// nobody holds or waits on it, so arbitrary ids do not accumulate.
    async fn lock_wlan<'a>(&'a self, wlan_id: &'a str) -> WlanGuard<'a> {
        let lock = Arc::clone(
            self.wlan_locks
                .entry(wlan_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let mut guard = WlanGuard {
            locks: &self.wlan_locks,
            wlan_id,
            held: None,
        };
        guard.held = Some(lock.lock_owned().await);
        guard
    }
}

struct WlanGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    wlan_id: &'a str,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for WlanGuard<'_> {
    fn drop(&mut self) {
        // Release our reference first; an entry only we referenced is idle.
        drop(self.held.take());
        self.locks
            .remove_if(self.wlan_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
