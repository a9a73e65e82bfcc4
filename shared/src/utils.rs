//! # Shared Utility Functions
//!
//! Display helpers used by the wallet core and the CLI.
//!
//! ## Address Formatting
//!
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `0x1234...abcd` style used in wallet badges
//!
//! ## Amounts
//!
//! - [`mist_to_sui`] / [`format_sui`] - Convert base units (MIST) to SUI
//!
//! ```rust
//! use shared::utils::{format_sui, truncate_address};
//!
//! assert_eq!(format_sui(1_500_000_000), "1.5000 SUI");
//! assert_eq!(truncate_address("0x9f1c77aa00e4b2"), "0x9f1c...e4b2");
//! ```

/// Base units per SUI (1 SUI = 10^9 MIST).
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x9f1c77aa00000000e4b2";
/// assert_eq!(format_address(addr, 6, 4), "0x9f1c...e4b2");
/// assert_eq!(format_address("short", 4, 4), "short");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    // Guard individual lengths too so slicing can never panic
    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
        || !address.is_ascii()
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format a wallet address the way the wallet badge shows it (`0x` plus four, last four).
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Convert MIST to SUI.
pub fn mist_to_sui(mist: u64) -> f64 {
    mist as f64 / MIST_PER_SUI as f64
}

/// Render a MIST amount as SUI with four decimals.
pub fn format_sui(mist: u64) -> String {
    format!("{:.4} SUI", mist_to_sui(mist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_address() {
        let addr = "0x9f1c77aa00000000000000000000000000000000000000000000000000e4b2";
        assert_eq!(format_address(addr, 6, 4), "0x9f1c...e4b2");
        assert_eq!(format_address(addr, 2, 2), "0x...b2");
    }

    #[test]
    fn test_format_address_short() {
        assert_eq!(format_address("short", 4, 4), "short");
        assert_eq!(format_address("", 4, 4), "");
    }

    #[test]
    fn test_format_sui() {
        assert_eq!(format_sui(0), "0.0000 SUI");
        assert_eq!(format_sui(MIST_PER_SUI), "1.0000 SUI");
        assert_eq!(format_sui(123_456_789), "0.1235 SUI");
        assert!((mist_to_sui(2_500_000_000) - 2.5).abs() < f64::EPSILON);
    }
}
