//! Concentrator networks: ordered layers sharing one configuration.

use std::fmt;
use std::sync::Arc;

use cnet_common::bytes::ByteQuantity;
use cnet_common::error::{ModelError, ModelResult};
use cnet_common::system::Config;
use serde::{Deserialize, Serialize};

use crate::builders::{DensityParams, FixedBufParams};
use crate::layer::Layer;

/// How a network's buffer size was chosen.
///
/// Doubles as the `[network]` section of a plan file, tagged by `strategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    /// Same fixed buffer size at every layer.
    Fixed(FixedBufParams),
    /// Buffer size derived from a target dartboard density.
    Density(DensityParams),
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Density(DensityParams::default())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(p) => write!(
                f,
                "Fixed buffer network of {} buffers, fan_out={}, fan_in={}",
                p.buf_bytes, p.fan_out, p.fan_in
            ),
            Self::Density(p) => write!(
                f,
                "Density based network: base density 1 bit every {} bytes over {} regions",
                p.one_bit_per_n_bytes, p.mark_region
            ),
        }
    }
}

/// An ordered sequence of layers, root first and leaf last.
///
/// Built in one shot by [`crate::builders`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    config: Arc<Config>,
    strategy: Strategy,
    layers: Vec<Layer>,
}

impl Network {
    /// Fails with `ModelError::Overflow` if the totals across layers do not
    /// fit in 64 bits.
    pub(crate) fn new(
        config: Arc<Config>,
        strategy: Strategy,
        layers: Vec<Layer>,
    ) -> ModelResult<Self> {
        debug_assert!(!layers.is_empty());

        let overflow = |quantity: &str| ModelError::Overflow {
            quantity: quantity.to_string(),
        };
        layers
            .iter()
            .try_fold(0u64, |acc, layer| acc.checked_add(layer.num_bufs()))
            .ok_or_else(|| overflow("total buffer count"))?;
        layers
            .iter()
            .try_fold(ByteQuantity::ZERO, |acc, layer| {
                acc.checked_add(layer.total_buf_bytes())
            })
            .ok_or_else(|| overflow("total buffer bytes"))?;

        Ok(Self {
            config,
            strategy,
            layers,
        })
    }

    /// Configuration shared by every layer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Strategy that built this network.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Layers, root first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Iterate layers, root first.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    /// Layer just above the dartboard.
    pub fn leaf(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Buffers across all layers.
    pub fn total_bufs(&self) -> u64 {
        self.iter().map(Layer::num_bufs).sum()
    }

    /// Byte cost of all buffers across all layers.
    pub fn total_buf_bytes(&self) -> ByteQuantity {
        self.iter().map(Layer::total_buf_bytes).sum()
    }

    /// Buffer cost as a fraction of the heap.
    pub fn overhead_ratio(&self) -> f64 {
        self.total_buf_bytes() / self.config.heap_bytes()
    }
}

impl<'a> IntoIterator for &'a Network {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
