//! Prelude module for common re-exports.
//!
//! `use cnet_common::prelude::*;` brings in the value types, units and error
//! types most callers need.

// ─── Values ─────────────────────────────────────────────────────────
pub use crate::bytes::ByteQuantity;
pub use crate::system::Config;

// ─── Units ──────────────────────────────────────────────────────────
pub use crate::consts::{GIB, KIB, MIB, TIB};

// ─── Errors ─────────────────────────────────────────────────────────
pub use crate::error::{ModelError, ModelResult};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig, SystemConfig};
