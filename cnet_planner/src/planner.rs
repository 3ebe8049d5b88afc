//! Layer planning: matching heap segmentation to processor grouping.
//!
//! The heap dimension and the processor dimension are sized independently:
//! heap segments grow by `fan_out` from the mark region up to the whole heap,
//! processor spans grow by `fan_in` from a single processor up to all of
//! them. The two sequences are then aligned to the same length so that every
//! layer of the network gets exactly one (segment, span) pairing.
//!
//! ```text
//! index 0        largest segment,  span 1          (per-processor, coarse)
//!   ...
//! index L-1      mark region,      span >= P       (shared, heap-local)
//! ```

use cnet_common::bytes::ByteQuantity;
use cnet_common::error::{ModelError, ModelResult};
use cnet_common::system::Config;
use tracing::debug;

/// Geometry of one planned layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPlan {
    /// Heap span covered by one buffer.
    pub seg_bytes: ByteQuantity,
    /// Processors sharing one buffer.
    pub p_span: u64,
}

/// Plan the (segment, span) pairs of a network, root first.
///
/// The result has `max(ceil(log_fan_out(heap / mark_region)), ceil(log_fan_in(P))) + 1`
/// entries. Segment sizes are non-increasing and spans non-decreasing along
/// it; the last entry covers exactly `mark_region_bytes`.
///
/// # Errors
///
/// - `ModelError::InvalidFanFactor` if `fan_out` or `fan_in` is below 2
/// - `ModelError::InvalidMarkRegion` if `mark_region_bytes` is zero
pub fn bidi_fan(
    config: &Config,
    mark_region_bytes: ByteQuantity,
    fan_out: u64,
    fan_in: u64,
) -> ModelResult<Vec<LayerPlan>> {
    if fan_out < 2 || fan_in < 2 {
        return Err(ModelError::InvalidFanFactor { fan_out, fan_in });
    }
    if mark_region_bytes.is_zero() {
        return Err(ModelError::InvalidMarkRegion);
    }

    // Bottom up: heap segmentation.
    let mut seg = mark_region_bytes;
    let mut segs = vec![seg];
    while seg < config.heap_bytes() {
        seg = seg.saturating_mul(fan_out);
        segs.push(seg);
    }

    // Top down: processor fan-in.
    let mut span = 1u64;
    let mut spans = vec![span];
    while span < config.num_processors() {
        span = span.saturating_mul(fan_in);
        spans.push(span);
    }

    let len = segs.len().max(spans.len());
    segs.resize(len, seg);
    spans.resize(len, span);
    segs.reverse();

    let plan: Vec<LayerPlan> = segs
        .into_iter()
        .zip(spans)
        .map(|(seg_bytes, p_span)| LayerPlan { seg_bytes, p_span })
        .collect();

    for (idx, layer) in plan.iter().enumerate() {
        debug!(
            "layer {}: {} segments, span {}",
            idx, layer.seg_bytes, layer.p_span
        );
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnet_common::consts::{GIB, MIB};

    fn plan(heap: ByteQuantity, procs: u64, mark: ByteQuantity, fo: u64, fi: u64) -> Vec<LayerPlan> {
        let config = Config::new(heap, procs).unwrap();
        bidi_fan(&config, mark, fo, fi).unwrap()
    }

    fn pairs(plan: &[LayerPlan]) -> Vec<(u64, u64)> {
        plan.iter()
            .map(|l| (l.seg_bytes.as_u64() >> 20, l.p_span))
            .collect()
    }

    #[test]
    fn pairing_for_one_gib_eight_procs() {
        // Heap: 32, 128, 512, 2048 MiB. Procs: 1, 2, 4, 8.
        let plan = plan(GIB, 8, 32 * MIB, 4, 2);
        assert_eq!(
            pairs(&plan),
            vec![(2048, 1), (512, 2), (128, 4), (32, 8)]
        );
    }

    #[test]
    fn shorter_processor_sequence_is_padded() {
        // Heap: 32, 512, 8192 MiB. Procs: 1, 4.
        let plan = plan(GIB, 2, 32 * MIB, 16, 4);
        assert_eq!(pairs(&plan), vec![(8192, 1), (512, 4), (32, 4)]);
    }

    #[test]
    fn shorter_heap_sequence_is_padded() {
        // Heap: 32, 64 MiB. Procs: 1, 2, 4, 8, 16.
        let plan = plan(64 * MIB, 16, 32 * MIB, 2, 2);
        assert_eq!(
            pairs(&plan),
            vec![(64, 1), (64, 2), (64, 4), (64, 8), (32, 16)]
        );
    }

    #[test]
    fn mark_region_covering_heap_gives_single_layer() {
        let plan = plan(32 * MIB, 1, 32 * MIB, 16, 4);
        assert_eq!(pairs(&plan), vec![(32, 1)]);
    }

    #[test]
    fn fan_factor_below_two_rejected() {
        let config = Config::new(GIB, 8).unwrap();
        assert_eq!(
            bidi_fan(&config, MIB, 1, 4),
            Err(ModelError::InvalidFanFactor { fan_out: 1, fan_in: 4 })
        );
        assert_eq!(
            bidi_fan(&config, MIB, 16, 1),
            Err(ModelError::InvalidFanFactor { fan_out: 16, fan_in: 1 })
        );
        assert!(bidi_fan(&config, MIB, 0, 0).is_err());
    }

    #[test]
    fn zero_mark_region_rejected() {
        let config = Config::new(GIB, 8).unwrap();
        assert_eq!(
            bidi_fan(&config, ByteQuantity::ZERO, 16, 4),
            Err(ModelError::InvalidMarkRegion)
        );
    }

    #[test]
    fn huge_fan_factors_saturate() {
        let config = Config::new(ByteQuantity::new(u64::MAX), u64::MAX).unwrap();
        let plan = bidi_fan(&config, ByteQuantity::new(1 << 40), u64::MAX, u64::MAX).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].seg_bytes, ByteQuantity::new(u64::MAX));
        assert_eq!(plan[1].p_span, u64::MAX);
    }
}
