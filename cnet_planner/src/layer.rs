//! One level of the concentrator hierarchy.

use std::sync::Arc;

use cnet_common::bytes::ByteQuantity;
use cnet_common::error::{ModelError, ModelResult};
use cnet_common::system::Config;

use crate::address::address_width;

/// One layer of buffers.
///
/// Every buffer in the layer covers `seg_bytes` of heap and is shared by
/// `p_span` processors. The heap is tiled by segments and the processors by
/// spans, so the layer holds one buffer per (processor group, heap segment)
/// pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    config: Arc<Config>,
    seg_bytes: ByteQuantity,
    p_span: u64,
    buf_bytes: ByteQuantity,
}

impl Layer {
    /// Create a layer.
    ///
    /// Segments wider than the heap and spans wider than the processor count
    /// are allowed; they tile the whole dimension with a single buffer.
    ///
    /// # Errors
    ///
    /// - `ModelError::InvalidMarkRegion` if `seg_bytes` is zero
    /// - `ModelError::InvalidConfig` if `p_span` is zero
    /// - `ModelError::InvalidBufferSize` if `buf_bytes` is zero
    /// - `ModelError::Overflow` if the buffer count or the layer's byte cost
    ///   does not fit in 64 bits
    pub fn new(
        config: Arc<Config>,
        seg_bytes: ByteQuantity,
        p_span: u64,
        buf_bytes: ByteQuantity,
    ) -> ModelResult<Self> {
        if seg_bytes.is_zero() {
            return Err(ModelError::InvalidMarkRegion);
        }
        if p_span == 0 {
            return Err(ModelError::InvalidConfig {
                reason: "p_span must be at least 1".to_string(),
            });
        }
        if buf_bytes.is_zero() {
            return Err(ModelError::InvalidBufferSize {
                reason: "layer buffers must hold at least one byte".to_string(),
            });
        }
        let layer = Self {
            config,
            seg_bytes,
            p_span,
            buf_bytes,
        };
        layer.checked_total_buf_bytes()?;
        Ok(layer)
    }

    /// Layer cost computed without wrapping. Accessors below rely on
    /// `new` having run this.
    fn checked_total_buf_bytes(&self) -> ModelResult<ByteQuantity> {
        let num_bufs = self
            .p_count()
            .checked_mul(self.heap_count())
            .ok_or_else(|| ModelError::Overflow {
                quantity: format!("buffer count of {} segments", self.seg_bytes),
            })?;
        self.buf_bytes
            .checked_mul(num_bufs)
            .ok_or_else(|| ModelError::Overflow {
                quantity: format!("{num_bufs} buffers of {}", self.buf_bytes),
            })
    }

    /// Configuration shared with the rest of the network.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Heap span covered by one buffer.
    #[inline]
    pub fn seg_bytes(&self) -> ByteQuantity {
        self.seg_bytes
    }

    /// Processors sharing one buffer.
    #[inline]
    pub fn p_span(&self) -> u64 {
        self.p_span
    }

    /// Capacity of one buffer.
    #[inline]
    pub fn buf_bytes(&self) -> ByteQuantity {
        self.buf_bytes
    }

    /// Number of processor groups.
    pub fn p_count(&self) -> u64 {
        self.config.num_processors().div_ceil(self.p_span)
    }

    /// Number of heap segments.
    pub fn heap_count(&self) -> u64 {
        self.config.heap_bytes().div_ceil(self.seg_bytes)
    }

    /// The total number of buffers in this layer.
    pub fn num_bufs(&self) -> u64 {
        self.p_count() * self.heap_count()
    }

    /// Width of one stored address.
    pub fn address_width(&self) -> ByteQuantity {
        address_width(&self.config, self.seg_bytes)
    }

    /// The number of addresses that can be stored in a buffer in this layer.
    pub fn buf_len(&self) -> u64 {
        self.buf_bytes.div_floor(self.address_width())
    }

    /// Heap words covered by one buffer.
    pub fn words(&self) -> u64 {
        self.seg_bytes.div_floor(self.config.word_bytes())
    }

    /// Byte cost of every buffer in the layer.
    pub fn total_buf_bytes(&self) -> ByteQuantity {
        self.buf_bytes * self.num_bufs()
    }
}
