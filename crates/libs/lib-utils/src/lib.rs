//! # Utilities Library
//!
//! Shared helpers for environment variables, time and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse, get_env_parse_or};
pub use time::{format_time, now_utc, parse_utc, seconds_since};
pub use validation::{is_sui_address, validate_not_empty, validate_sui_address, SUI_ADDRESS_HEX_LEN};
