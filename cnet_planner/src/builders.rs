//! Network construction strategies.
//!
//! Both builders share the layer planner and differ only in how they pick the
//! buffer size and the mark region:
//!
//! - [`fixed_buf_network`] uses one fixed buffer size everywhere and a mark
//!   region of 2^16 words, so leaf offsets fit in 16 bits.
//! - [`density_network`] derives the buffer size from a target density of
//!   set bits in the dartboard. Almost all of the buffer overhead sits in the
//!   leaf layer and is proportional to that density, so dialing in a density
//!   dials in an overhead.

use std::sync::Arc;

use cnet_common::bytes::ByteQuantity;
use cnet_common::consts::{
    DENSITY_DEFAULT_FAN_IN, DENSITY_DEFAULT_FAN_OUT, DENSITY_DEFAULT_MARK_REGION,
    DENSITY_DEFAULT_ONE_BIT_PER_N_BYTES, FIXED_DEFAULT_BUF_BYTES, FIXED_DEFAULT_FAN_IN,
    FIXED_DEFAULT_FAN_OUT, FIXED_MARK_REGION_WORDS,
};
use cnet_common::error::{ModelError, ModelResult};
use cnet_common::system::Config;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::address::address_width;
use crate::layer::Layer;
use crate::network::{Network, Strategy};
use crate::planner::bidi_fan;

/// Parameters of [`fixed_buf_network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixedBufParams {
    /// Heap fan-out per layer.
    pub fan_out: u64,
    /// Processor fan-in per layer.
    pub fan_in: u64,
    /// Capacity of every buffer.
    pub buf_bytes: ByteQuantity,
}

impl Default for FixedBufParams {
    fn default() -> Self {
        Self {
            fan_out: FIXED_DEFAULT_FAN_OUT,
            fan_in: FIXED_DEFAULT_FAN_IN,
            buf_bytes: FIXED_DEFAULT_BUF_BYTES,
        }
    }
}

/// Parameters of [`density_network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DensityParams {
    /// Target of one set dartboard bit per this many heap bytes when a full
    /// leaf buffer is flushed.
    pub one_bit_per_n_bytes: u64,
    /// Heap span of one leaf buffer.
    pub mark_region: ByteQuantity,
    /// Heap fan-out per layer.
    pub fan_out: u64,
    /// Processor fan-in per layer.
    pub fan_in: u64,
}

impl Default for DensityParams {
    fn default() -> Self {
        Self {
            one_bit_per_n_bytes: DENSITY_DEFAULT_ONE_BIT_PER_N_BYTES,
            mark_region: DENSITY_DEFAULT_MARK_REGION,
            fan_out: DENSITY_DEFAULT_FAN_OUT,
            fan_in: DENSITY_DEFAULT_FAN_IN,
        }
    }
}

/// Mark region of the fixed-buffer strategy: 2^16 words.
pub fn fixed_mark_region(config: &Config) -> ByteQuantity {
    config.word_bytes().saturating_mul(FIXED_MARK_REGION_WORDS)
}

/// Build a network with the same buffer size at every layer.
///
/// # Errors
///
/// - `ModelError::InvalidFanFactor` if either fan factor is below 2
/// - `ModelError::InvalidBufferSize` if `buf_bytes` is zero
/// - `ModelError::Overflow` if the buffer cost does not fit in 64 bits
pub fn fixed_buf_network(
    config: impl Into<Arc<Config>>,
    params: FixedBufParams,
) -> ModelResult<Network> {
    let config = config.into();
    let strategy = Strategy::Fixed(params);
    info!("{strategy}");

    if params.buf_bytes.is_zero() {
        return Err(ModelError::InvalidBufferSize {
            reason: "fixed buffer size must be positive".to_string(),
        });
    }

    let mark_region = fixed_mark_region(&config);
    assemble(config, strategy, mark_region, params.fan_out, params.fan_in, params.buf_bytes)
}

/// Leaf buffer size that yields the requested dartboard density.
///
/// A full leaf buffer holds `buf_len` addresses spread over
/// `mark_region / word_bytes` words, so one bit lands every
/// `8 * mark_region / buf_len` bits of heap. Solving for `buf_len`:
///
/// ```text
/// buf_len   = mark_region / (8 * one_bit_per_n_bytes * word_bytes)
/// buf_bytes = buf_len * address_width(mark_region)
/// ```
///
/// # Errors
///
/// - `ModelError::InvalidDensity` if `one_bit_per_n_bytes` is zero
/// - `ModelError::InvalidBufferSize` if the density is too sparse for a
///   single address to fit in the region
pub fn density_buf_bytes(
    config: &Config,
    one_bit_per_n_bytes: u64,
    mark_region: ByteQuantity,
) -> ModelResult<ByteQuantity> {
    if one_bit_per_n_bytes == 0 {
        return Err(ModelError::InvalidDensity {
            one_bit_per_n_bytes,
        });
    }

    let one_bit_per_n_bits = one_bit_per_n_bytes.saturating_mul(8);
    let bytes_per_slot = config.word_bytes().saturating_mul(one_bit_per_n_bits);
    let buf_len = mark_region.div_floor(bytes_per_slot);
    let buf_bytes = address_width(config, mark_region) * buf_len;

    if buf_bytes.is_zero() {
        return Err(ModelError::InvalidBufferSize {
            reason: format!(
                "1 bit every {one_bit_per_n_bytes} bytes leaves no room for an address in a {mark_region} region"
            ),
        });
    }
    Ok(buf_bytes)
}

/// Build a network whose buffer size is derived from a target dartboard
/// density.
///
/// The leaf buffer size is applied to every layer. Smaller buffers in the
/// upper layers complicate the network with no appreciable benefit.
///
/// # Errors
///
/// - `ModelError::InvalidFanFactor` if either fan factor is below 2
/// - `ModelError::InvalidMarkRegion` if `mark_region` is zero
/// - `ModelError::InvalidDensity` if `one_bit_per_n_bytes` is zero
/// - `ModelError::InvalidBufferSize` if the density leaves an empty buffer
/// - `ModelError::Overflow` if the buffer cost does not fit in 64 bits
pub fn density_network(
    config: impl Into<Arc<Config>>,
    params: DensityParams,
) -> ModelResult<Network> {
    let config = config.into();
    let strategy = Strategy::Density(params);
    info!("{strategy}");

    if params.mark_region.is_zero() {
        return Err(ModelError::InvalidMarkRegion);
    }
    let buf_bytes = density_buf_bytes(&config, params.one_bit_per_n_bytes, params.mark_region)?;
    assemble(
        config,
        strategy,
        params.mark_region,
        params.fan_out,
        params.fan_in,
        buf_bytes,
    )
}

/// Build a network from a strategy description.
pub fn build_network(config: impl Into<Arc<Config>>, strategy: Strategy) -> ModelResult<Network> {
    match strategy {
        Strategy::Fixed(params) => fixed_buf_network(config, params),
        Strategy::Density(params) => density_network(config, params),
    }
}

fn assemble(
    config: Arc<Config>,
    strategy: Strategy,
    mark_region: ByteQuantity,
    fan_out: u64,
    fan_in: u64,
    buf_bytes: ByteQuantity,
) -> ModelResult<Network> {
    let layers = bidi_fan(&config, mark_region, fan_out, fan_in)?
        .into_iter()
        .map(|plan| Layer::new(config.clone(), plan.seg_bytes, plan.p_span, buf_bytes))
        .collect::<ModelResult<Vec<_>>>()?;
    Network::new(config, strategy, layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnet_common::consts::{GIB, KIB, MIB, TIB};

    #[test]
    fn fixed_mark_region_is_64k_words() {
        let config = Config::new(GIB, 1).unwrap();
        assert_eq!(fixed_mark_region(&config), 512 * KIB);
    }

    #[test]
    fn fixed_network_uses_same_buffer_everywhere() {
        let config = Config::new(16 * GIB, 16).unwrap();
        let network = fixed_buf_network(config, FixedBufParams::default()).unwrap();
        assert!(network.iter().all(|l| l.buf_bytes() == 4 * KIB));
        assert_eq!(network.leaf().seg_bytes(), 512 * KIB);
        // Heap: 512K, 8M, 128M, 2G, 32G (5). Procs: 1, 8, 64 (3).
        assert_eq!(network.layers().len(), 5);
    }

    #[test]
    fn fixed_network_rejects_empty_buffers() {
        let config = Config::new(GIB, 1).unwrap();
        let params = FixedBufParams {
            buf_bytes: ByteQuantity::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            fixed_buf_network(config, params),
            Err(ModelError::InvalidBufferSize { .. })
        ));
    }

    #[test]
    fn density_buffer_for_defaults() {
        let config = Config::new(GIB, 8).unwrap();
        // 32 MiB / (8 * 32 * 8) = 16384 slots of 4 bytes.
        let buf = density_buf_bytes(&config, 32, 32 * MIB).unwrap();
        assert_eq!(buf, 64 * KIB);
    }

    #[test]
    fn density_network_applies_leaf_size_uniformly() {
        let config = Config::new(GIB, 8).unwrap();
        let network = density_network(config, DensityParams::default()).unwrap();
        assert!(network.iter().all(|l| l.buf_bytes() == 64 * KIB));
        assert_eq!(network.leaf().seg_bytes(), 32 * MIB);
    }

    #[test]
    fn sparser_density_means_smaller_buffers() {
        let config = Config::new(GIB, 8).unwrap();
        let sizes: Vec<ByteQuantity> = [8, 16, 32, 64, 128, 256]
            .into_iter()
            .map(|n| density_buf_bytes(&config, n, 32 * MIB).unwrap())
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] > w[1]), "{sizes:?}");
    }

    #[test]
    fn density_rejects_degenerate_targets() {
        let config = Config::new(GIB, 8).unwrap();
        assert_eq!(
            density_buf_bytes(&config, 0, 32 * MIB),
            Err(ModelError::InvalidDensity { one_bit_per_n_bytes: 0 })
        );
        assert!(matches!(
            density_buf_bytes(&config, 1 << 30, 32 * MIB),
            Err(ModelError::InvalidBufferSize { .. })
        ));
        let params = DensityParams {
            mark_region: ByteQuantity::ZERO,
            ..Default::default()
        };
        assert_eq!(
            density_network(config, params),
            Err(ModelError::InvalidMarkRegion)
        );
    }

    #[test]
    fn builders_propagate_fan_errors() {
        let config = Arc::new(Config::new(GIB, 8).unwrap());
        let fixed = FixedBufParams {
            fan_out: 1,
            ..Default::default()
        };
        assert!(matches!(
            fixed_buf_network(config.clone(), fixed),
            Err(ModelError::InvalidFanFactor { .. })
        ));
        let density = DensityParams {
            fan_in: 1,
            ..Default::default()
        };
        assert!(matches!(
            density_network(config, density),
            Err(ModelError::InvalidFanFactor { .. })
        ));
    }

    #[test]
    fn fixed_network_cost_overflow_is_an_error() {
        let config = Config::new(ByteQuantity::new(1 << 62), 1).unwrap();
        let params = FixedBufParams {
            buf_bytes: TIB,
            ..Default::default()
        };
        assert!(matches!(
            fixed_buf_network(config, params),
            Err(ModelError::Overflow { .. })
        ));
    }

    #[test]
    fn build_network_dispatches_on_strategy() {
        let config = Arc::new(Config::new(GIB, 8).unwrap());
        let strategy = Strategy::Fixed(FixedBufParams::default());
        let network = build_network(config, strategy).unwrap();
        assert_eq!(network.strategy(), &strategy);
    }
}
