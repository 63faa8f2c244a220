// ── Domain model ──
//
// Typed views of the controller objects the gateway touches. Optional
// controller fields are resolved at the conversion boundary (`convert.rs`),
// not in the managers.

pub mod client;
pub mod mac;
pub mod wlan;

pub use client::{ClientRecord, ClientSummary};
pub use mac::MacAddress;
pub use wlan::{CreatedPpsk, PpskDescriptor, PpskEntry, RemovalResult, WlanConfig};
