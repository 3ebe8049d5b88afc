//! Plan files: a machine and a strategy in one TOML document.
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "cnet-64g"
//!
//! [system]
//! heap = "64 GiB"
//! processors = 64
//!
//! [network]
//! strategy = "density"
//! one_bit_per_n_bytes = 32
//! mark_region = "32 MiB"
//! ```
//!
//! Network fields left out take the builder defaults.

use cnet_common::config::{ConfigError, SharedConfig, SystemConfig};
use cnet_common::error::ModelError;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::builders::build_network;
use crate::network::{Network, Strategy};

/// Errors from turning a plan file into a network.
#[derive(Debug, Error)]
pub enum PlanError {
    /// File could not be read, parsed or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network could not be built from the parameters.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Contents of a plan file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Name and log level.
    pub shared: SharedConfig,
    /// Machine to size for.
    pub system: SystemConfig,
    /// Strategy and its parameters.
    #[serde(default)]
    pub network: Strategy,
}

impl PlanFile {
    /// Validate and build the planned network.
    ///
    /// # Errors
    ///
    /// - `PlanError::Config` if the shared or system section is invalid
    /// - `PlanError::Model` if the builder rejects the network parameters
    pub fn build(&self) -> Result<Network, PlanError> {
        self.shared.validate()?;
        let config = self.system.to_config()?;
        info!(
            "Plan '{}': {} heap, {} processors",
            self.shared.service_name,
            config.heap_bytes(),
            config.num_processors()
        );
        Ok(build_network(config, self.network)?)
    }
}
