//! Address width of a heap segment.

use cnet_common::bytes::ByteQuantity;
use cnet_common::system::Config;

/// Bytes needed to address any word inside a segment of `seg_bytes`.
///
/// A buffer covering the segment stores word offsets of this width, so the
/// width decides how many entries fit in a buffer of a given byte size.
pub fn address_width(config: &Config, seg_bytes: ByteQuantity) -> ByteQuantity {
    let words = seg_bytes.div_floor(config.word_bytes());
    let width = if words <= 1 << 8 {
        1
    } else if words <= 1 << 16 {
        2
    } else if words <= 1 << 32 {
        4
    } else {
        8
    };
    ByteQuantity::new(width)
}
