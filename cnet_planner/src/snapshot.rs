//! Serializable view of a network for external renderers.
//!
//! A renderer needs the configuration plus, per layer, the segment span,
//! processor span, buffer size and the derived buffer count and length.
//! Nothing else about the model leaks through.

use cnet_common::bytes::ByteQuantity;
use cnet_common::system::Config;
use serde::Serialize;

use crate::layer::Layer;
use crate::network::{Network, Strategy};

/// One layer as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSnapshot {
    /// Heap span of one buffer.
    pub seg_bytes: ByteQuantity,
    /// Processors sharing one buffer.
    pub p_span: u64,
    /// Capacity of one buffer.
    pub buf_bytes: ByteQuantity,
    /// Buffers in the layer.
    pub num_bufs: u64,
    /// Addresses one buffer holds.
    pub buf_len: u64,
}

impl From<&Layer> for LayerSnapshot {
    fn from(layer: &Layer) -> Self {
        Self {
            seg_bytes: layer.seg_bytes(),
            p_span: layer.p_span(),
            buf_bytes: layer.buf_bytes(),
            num_bufs: layer.num_bufs(),
            buf_len: layer.buf_len(),
        }
    }
}

/// A whole network as seen by a renderer, root layer first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSnapshot {
    /// Machine the network is sized for.
    pub config: Config,
    /// Strategy and parameters that built it.
    pub network: Strategy,
    /// Layers, root first.
    pub layers: Vec<LayerSnapshot>,
    /// Buffers across all layers.
    pub total_bufs: u64,
    /// Byte cost of all buffers.
    pub total_buf_bytes: ByteQuantity,
}

impl From<&Network> for NetworkSnapshot {
    fn from(network: &Network) -> Self {
        Self {
            config: network.config().clone(),
            network: *network.strategy(),
            layers: network.iter().map(LayerSnapshot::from).collect(),
            total_bufs: network.total_bufs(),
            total_buf_bytes: network.total_buf_bytes(),
        }
    }
}

impl NetworkSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
