//! # Validation Utilities
//!
//! Input validation helpers.

/// Hex digits in a Sui address or object id after the `0x` prefix.
pub const SUI_ADDRESS_HEX_LEN: usize = 64;

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Check the Sui address format: `0x` followed by exactly 64 hex digits.
pub fn is_sui_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(hex) => hex.len() == SUI_ADDRESS_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Validate a Sui address (or object id), returning a user-facing message on failure.
pub fn validate_sui_address(value: &str, field_name: &str) -> Result<(), String> {
    validate_not_empty(value, field_name)?;

    if !value.starts_with("0x") {
        return Err(format!("{} must start with 0x", field_name));
    }
    if !is_sui_address(value) {
        return Err(format!(
            "{} must be 0x followed by {} hex characters",
            field_name, SUI_ADDRESS_HEX_LEN
        ));
    }
    Ok(())
}
