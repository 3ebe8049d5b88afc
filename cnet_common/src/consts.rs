//! Unit sizes and model defaults.
//!
//! Single source of truth for the binary units and for the defaults of the
//! two network builders.

use crate::bytes::ByteQuantity;

/// One kibibyte.
pub const KIB: ByteQuantity = ByteQuantity::new(1 << 10);

/// One mebibyte.
pub const MIB: ByteQuantity = ByteQuantity::new(1 << 20);

/// One gibibyte.
pub const GIB: ByteQuantity = ByteQuantity::new(1 << 30);

/// One tebibyte.
pub const TIB: ByteQuantity = ByteQuantity::new(1 << 40);

/// Default heap word size.
pub const DEFAULT_WORD_BYTES: ByteQuantity = ByteQuantity::new(8);

/// Word offsets inside a fixed-buffer mark region are 16 bits wide.
pub const FIXED_MARK_REGION_WORDS: u64 = 1 << 16;

/// Default heap fan-out of the fixed-buffer builder.
pub const FIXED_DEFAULT_FAN_OUT: u64 = 16;

/// Default processor fan-in of the fixed-buffer builder.
pub const FIXED_DEFAULT_FAN_IN: u64 = 8;

/// Default buffer capacity of the fixed-buffer builder.
pub const FIXED_DEFAULT_BUF_BYTES: ByteQuantity = ByteQuantity::new(4 << 10);

/// Default density target: one set bit per 32 bytes of heap, i.e. two bits
/// per 64-byte cache line.
pub const DENSITY_DEFAULT_ONE_BIT_PER_N_BYTES: u64 = 32;

/// Default heap span of one leaf buffer in the density builder.
pub const DENSITY_DEFAULT_MARK_REGION: ByteQuantity = ByteQuantity::new(32 << 20);

/// Default heap fan-out of the density builder.
pub const DENSITY_DEFAULT_FAN_OUT: u64 = 16;

/// Default processor fan-in of the density builder.
pub const DENSITY_DEFAULT_FAN_IN: u64 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_are_consecutive_powers_of_1024() {
        assert_eq!(KIB.as_u64() * 1024, MIB.as_u64());
        assert_eq!(MIB.as_u64() * 1024, GIB.as_u64());
        assert_eq!(GIB.as_u64() * 1024, TIB.as_u64());
    }

    #[test]
    fn fan_defaults_terminate_planner() {
        assert!(FIXED_DEFAULT_FAN_OUT >= 2 && FIXED_DEFAULT_FAN_IN >= 2);
        assert!(DENSITY_DEFAULT_FAN_OUT >= 2 && DENSITY_DEFAULT_FAN_IN >= 2);
    }
}
