//! # Concentrator Network Planner
//!
//! Sizes the layered buffer networks that carry mark addresses from the
//! processors of a parallel collector down to the heap's dartboard.
//!
//! # Module Structure
//!
//! - [`address`] - Smallest address encoding for a heap segment
//! - [`layer`] - One layer of buffers and its derived geometry
//! - [`planner`] - Bidirectional fan planning of heap and processor spans
//! - [`network`] - Ordered layers plus the strategy that built them
//! - [`builders`] - Fixed-buffer and density-driven construction
//! - [`report`] - Human-readable network report
//! - [`sweep`] - Machine-size sweeps and overhead grids
//! - [`snapshot`] - Serializable network view for renderers
//! - [`plan`] - TOML plan files
//!
//! # Architecture
//!
//! ```text
//!  processors   P0  P1  P2  P3 ...            root layer: p_span = 1
//!                 \  |   |  /                 seg = heap / fan_out^k
//!                  [buf][buf]                        │
//!                      │                             ▼
//!                    [buf]                    leaf layer: p_span ≥ P
//!                      │                      seg = mark region
//!                      ▼
//!               dartboard (1 bit per word)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cnet_common::prelude::*;
//! use cnet_planner::{density_network, render_report, DensityParams};
//!
//! let network = density_network(Config::new(GIB, 8).unwrap(), DensityParams::default()).unwrap();
//! let text = render_report(&network);
//! assert!(text.starts_with("Density based network"));
//! ```

#![deny(missing_docs)]

pub mod address;
pub mod builders;
pub mod layer;
pub mod network;
pub mod plan;
pub mod planner;
pub mod report;
pub mod snapshot;
pub mod sweep;

// Re-export key types for convenience
pub use crate::address::address_width;
pub use crate::builders::{
    build_network, density_buf_bytes, density_network, fixed_buf_network, DensityParams,
    FixedBufParams,
};
pub use crate::layer::Layer;
pub use crate::network::{Network, Strategy};
pub use crate::plan::{PlanError, PlanFile};
pub use crate::planner::{bidi_fan, LayerPlan};
pub use crate::report::{render_report, Report};
pub use crate::snapshot::NetworkSnapshot;
pub use crate::sweep::{sweep_report, OverheadGrid, Sweep};
