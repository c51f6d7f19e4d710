//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (JSON file on native, LocalStorage on web)
//! - Input mapping from raw keys and pointer zones to table actions

pub mod input;
pub mod storage;

pub use input::{Zone, key_event, zone_event};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
#[cfg(not(target_arch = "wasm32"))]
pub use storage::JsonFileStore;
