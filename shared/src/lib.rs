//! # Shared Session Types
//!
//! Types that cross the boundary between the wallet core, the persisted session
//! and whatever renders it (CLI today, a web front end tomorrow).
//!
//! ## Structure
//!
//! - **[`dto`]**: Persisted and wire-level data
//!   - **[`dto::session`]**: `SessionRecord` and the legacy `LegacyWalletBlob` shape
//!   - **[`dto::network`]**: Sui network selection and endpoints
//! - **[`utils`]**: Display helpers
//!   - **[`utils::format_address`]**: Shorten wallet addresses for display
//!   - **[`utils::format_sui`]**: Render MIST amounts as SUI
//!
//! ## Wire Format
//!
//! Everything serializes to JSON through `serde`:
//! - Field names stay **snake_case**, except the legacy blob which keeps the
//!   camelCase keys older front ends wrote
//! - Optional fields are omitted when `None`
//! - Enums serialize to lowercase strings
//!
//! ```rust
//! use shared::dto::{Network, SessionRecord};
//!
//! let record = SessionRecord::demo(Network::Testnet);
//! let json = serde_json::to_string(&record).unwrap();
//! assert!(json.contains("\"is_demo_mode\":true"));
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
