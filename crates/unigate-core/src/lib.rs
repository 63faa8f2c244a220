//! Domain layer between `unigate-api` and the HTTP gateway.
//!
//! - **[`ControllerSession`]**: owns the authenticated session against one
//!   controller identity. Detects the platform and logs in lazily, re-using
//!   the session while its cookie is held and re-authenticating after the
//!   controller rejects it.
//!
//! - **[`ControllerGateway`]**: the typed call surface the managers depend
//!   on (fetch/replace WLANs, list/rename clients). [`LegacyGateway`] is the
//!   production implementation over a shared session.
//!
//! - **[`PpskManager`]**: lists, creates, and removes private pre-shared
//!   keys. Every mutation re-fetches the WLAN, edits the snapshot, and writes
//!   the whole object back.
//!
//! - **[`ClientDirectory`]**: normalized client listing and alias changes
//!   keyed by MAC address.

pub mod clients;
pub mod config;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod model;
pub mod ppsk;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

// ── Primary re-exports ──────────────────────────────────────────────
pub use clients::ClientDirectory;
pub use config::{ControllerConfig, TlsVerification};
pub use error::CoreError;
pub use gateway::{ControllerGateway, LegacyGateway};
pub use model::{
    ClientRecord, ClientSummary, CreatedPpsk, MacAddress, PpskDescriptor, PpskEntry,
    RemovalResult, WlanConfig,
};
pub use ppsk::PpskManager;
pub use session::ControllerSession;

pub use unigate_api::ControllerPlatform;
