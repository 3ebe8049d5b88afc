//! Property tests for the layer planner and the networks built on it.

use cnet_common::prelude::*;
use cnet_planner::{bidi_fan, density_network, DensityParams, Layer};
use proptest::prelude::*;
use std::sync::Arc;

/// Smallest `k` with `base^k >= x`.
fn ceil_log(x: u64, base: u64) -> usize {
    let mut k = 0;
    let mut acc = 1u64;
    while acc < x {
        acc = acc.saturating_mul(base);
        k += 1;
    }
    k
}

fn machine() -> impl Strategy<Value = (u64, u64, u64)> {
    // (mark region, heap, processors) with heap >= mark region.
    (10u32..=26, 1u64..=1 << 20, 1u64..=4096)
        .prop_map(|(mark_pow, mult, procs)| (1u64 << mark_pow, (1u64 << mark_pow) * mult, procs))
}

proptest! {
    #[test]
    fn plan_length_is_longer_dimension_plus_one(
        (mark, heap, procs) in machine(),
        fan_out in 2u64..=16,
        fan_in in 2u64..=16,
    ) {
        let config = Config::new(ByteQuantity::new(heap), procs).unwrap();
        let plan = bidi_fan(&config, ByteQuantity::new(mark), fan_out, fan_in).unwrap();

        let heap_steps = ceil_log(heap.div_ceil(mark), fan_out);
        let proc_steps = ceil_log(procs, fan_in);
        prop_assert_eq!(plan.len(), heap_steps.max(proc_steps) + 1);
    }

    #[test]
    fn plan_is_ordered_root_to_leaf(
        (mark, heap, procs) in machine(),
        fan_out in 2u64..=16,
        fan_in in 2u64..=16,
    ) {
        let config = Config::new(ByteQuantity::new(heap), procs).unwrap();
        let plan = bidi_fan(&config, ByteQuantity::new(mark), fan_out, fan_in).unwrap();

        let first = plan[0];
        let last = plan[plan.len() - 1];
        prop_assert_eq!(first.p_span, 1);
        prop_assert!(first.seg_bytes.as_u64() >= heap);
        prop_assert_eq!(last.seg_bytes.as_u64(), mark);
        prop_assert!(last.p_span >= procs);

        for pair in plan.windows(2) {
            let (upper, lower) = (pair[0], pair[1]);
            prop_assert!(upper.seg_bytes >= lower.seg_bytes);
            prop_assert!(upper.p_span <= lower.p_span);

            let seg_ratio = upper.seg_bytes.as_u64() / lower.seg_bytes.as_u64();
            prop_assert!(seg_ratio == 1 || seg_ratio == fan_out);
            let span_ratio = lower.p_span / upper.p_span;
            prop_assert!(span_ratio == 1 || span_ratio == fan_in);
        }
    }

    #[test]
    fn layer_counts_follow_ceiling_division(
        heap in 1u64..=1 << 40,
        procs in 1u64..=1024,
        seg in 1u64..=1 << 36,
        p_span in 1u64..=2048,
    ) {
        let config = Arc::new(Config::new(ByteQuantity::new(heap), procs).unwrap());
        let layer = Layer::new(config, ByteQuantity::new(seg), p_span, 4 * KIB).unwrap();

        prop_assert_eq!(layer.p_count(), procs.div_ceil(p_span));
        prop_assert_eq!(layer.heap_count(), heap.div_ceil(seg));
        prop_assert_eq!(layer.num_bufs(), layer.p_count() * layer.heap_count());
        prop_assert!(layer.num_bufs() >= 1);
        prop_assert!(layer.buf_len() * layer.address_width().as_u64() <= 4096);
    }

    #[test]
    fn density_overhead_sums_layer_costs(
        heap_pow in 25u32..=40,
        procs in 1u64..=512,
        one_bit_per_n_bytes in prop::sample::select(vec![8u64, 16, 32, 64, 128]),
    ) {
        let heap = 1u64 << heap_pow;
        let params = DensityParams { one_bit_per_n_bytes, ..Default::default() };
        let network = density_network(Config::new(ByteQuantity::new(heap), procs).unwrap(), params)
            .unwrap();

        let manual: u64 = network
            .iter()
            .map(|l| l.num_bufs() * l.buf_bytes().as_u64())
            .sum();
        prop_assert_eq!(network.total_buf_bytes().as_u64(), manual);
        prop_assert!((network.overhead_ratio() - manual as f64 / heap as f64).abs() < 1e-12);
    }
}
