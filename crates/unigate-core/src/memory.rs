// ── In-memory controller ──
//
// A `ControllerGateway` that keeps WLANs and clients in process memory and
// counts every call, for exercising the managers without a network.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::gateway::ControllerGateway;
use crate::model::{ClientRecord, WlanConfig};

#[derive(Default)]
pub struct InMemoryGateway {
    wlans: Mutex<Vec<WlanConfig>>,
    clients: Mutex<Vec<ClientRecord>>,
    wlan_fetches: AtomicUsize,
    replaces: AtomicUsize,
    renames: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wlan(self, wlan: WlanConfig) -> Self {
        self.wlans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(wlan);
        self
    }

    pub fn with_client(self, client: ClientRecord) -> Self {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(client);
        self
    }

    /// Make every subsequent replace and rename fail with a remote error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current state of one WLAN.
    pub fn wlan(&self, wlan_id: &str) -> Option<WlanConfig> {
        self.wlans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|wlan| wlan.id == wlan_id)
            .cloned()
    }

    /// Current state of one client.
    pub fn client(&self, client_id: &str) -> Option<ClientRecord> {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|client| client.id.as_deref() == Some(client_id))
            .cloned()
    }

    pub fn wlan_fetches(&self) -> usize {
        self.wlan_fetches.load(Ordering::SeqCst)
    }

    pub fn replaces(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }

    pub fn renames(&self) -> usize {
        self.renames.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Remote {
                message: "Legacy API error: api.err.InvalidPayload".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ControllerGateway for InMemoryGateway {
    async fn fetch_wlans(&self) -> Result<Vec<WlanConfig>, CoreError> {
        self.wlan_fetches.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers can interleave between fetch and replace.
        tokio::task::yield_now().await;
        Ok(self
            .wlans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn replace_wlan(&self, wlan_id: &str, wlan: &WlanConfig) -> Result<bool, CoreError> {
        self.check_writable()?;
        self.replaces.fetch_add(1, Ordering::SeqCst);
        let mut wlans = self.wlans.lock().unwrap_or_else(PoisonError::into_inner);
        match wlans.iter_mut().find(|existing| existing.id == wlan_id) {
            Some(existing) => {
                *existing = wlan.clone();
                Ok(true)
            }
            None => Err(CoreError::Remote {
                message: format!("HTTP 400 Bad Request: unknown WLAN {wlan_id}"),
            }),
        }
    }

    async fn fetch_clients(&self) -> Result<Vec<ClientRecord>, CoreError> {
        Ok(self
            .clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn rename_client(&self, client_id: &str, name: &str) -> Result<bool, CoreError> {
        self.check_writable()?;
        self.renames.fetch_add(1, Ordering::SeqCst);
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        match clients.iter_mut().find(|client| client.id.as_deref() == Some(client_id)) {
            Some(client) => {
                client.name = Some(name.to_owned());
                Ok(true)
            }
            None => Err(CoreError::Remote {
                message: format!("HTTP 400 Bad Request: unknown client {client_id}"),
            }),
        }
    }
}
