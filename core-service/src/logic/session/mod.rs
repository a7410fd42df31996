//! Session Module - per-session prediction history
//!
//! - `history.rs`: append-only `SessionHistory`
//! - `store.rs`: `SessionStore` keyed by session UUID

pub mod history;
pub mod store;
#[cfg(test)]
mod tests;

pub use history::{HistoryEntry, SessionHistory};
pub use store::{SessionHandle, SessionInfo, SessionStore};
