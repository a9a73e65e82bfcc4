//! # Logging Infrastructure
//!
//! File-based structured logging for the `medichain` binary.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default `medichain=info,lib_wallet=info,warn`)
//! - `MEDICHAIN_LOG_DIR`: Log directory (default `logs`, file `medichain.log`, rotated daily)
//! - `MEDICHAIN_LOG_STDERR`: Mirror logs to stderr (1=on, 0=off)

pub mod config;
pub mod logger;

pub use logger::init as init_logger;
