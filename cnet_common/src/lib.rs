//! Concentrator network common library
//!
//! Value types and configuration plumbing shared by the concentrator network
//! planner.
//!
//! # Module Structure
//!
//! - [`bytes`] - Byte quantities with unit-aware arithmetic and formatting
//! - [`system`] - Validated analysis configuration (heap, processors, word size)
//! - [`config`] - TOML configuration loading traits and shared sections
//! - [`consts`] - Binary units and builder defaults
//! - [`error`] - Model error type
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use cnet_common::prelude::*;
//!
//! let config = Config::new(64 * GIB, 64).unwrap();
//! assert_eq!(config.heap_bytes().to_string(), "64.0 GiB");
//! ```

pub mod bytes;
pub mod config;
pub mod consts;
pub mod error;
pub mod prelude;
pub mod system;
