//! # Data Transfer Objects (DTOs)
//!
//! Data persisted by the session store and handed to UI listeners.
//!
//! ## Module Organization
//!
//! - [`session`] - The single persisted session record and its legacy shape
//! - [`network`] - Ledger network enumeration with endpoint metadata
//!
//! ## Example Persisted Record
//!
//! ```text
//! {
//!   "address": "0x9f1c...e4b2",
//!   "provider_name": "Slush",
//!   "is_demo_mode": false,
//!   "network": "testnet",
//!   "connected_at_utc": "2024-05-01T09:30:00Z"
//! }
//! ```

pub mod network;
pub mod session;

pub use network::*;
pub use session::*;
