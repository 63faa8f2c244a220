// Legacy API client modules
//
// Hand-written client for the UniFi controller's legacy (non-OpenAPI) endpoints
// used by the gateway: session login, WLAN configuration, and known clients.
// Every response is wrapped in the `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod auth;
pub mod client;
pub mod clients;
pub mod models;
pub mod wlans;

pub use client::LegacyClient;
