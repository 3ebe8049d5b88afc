//! Error types for the sizing model.

use thiserror::Error;

/// Errors raised while constructing quantities, configurations and networks.
///
/// Every error is raised synchronously at the point of construction. Nothing
/// in the model retries or substitutes a default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Bit count is not a whole number of bytes.
    #[error("{bits} bits is not a multiple of 8")]
    InvalidBitCount {
        /// Offending bit count
        bits: u64,
    },

    /// Analysis configuration failed validation.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which field was rejected and why
        reason: String,
    },

    /// Fan factor below 2; the layer planner would never terminate.
    #[error("Invalid fan factors: fan_out={fan_out}, fan_in={fan_in} (both must be >= 2)")]
    InvalidFanFactor {
        /// Heap fan-out factor
        fan_out: u64,
        /// Processor fan-in factor
        fan_in: u64,
    },

    /// Mark region of zero bytes.
    #[error("Mark region must cover at least one byte")]
    InvalidMarkRegion,

    /// Buffer capacity of zero bytes.
    #[error("Invalid buffer size: {reason}")]
    InvalidBufferSize {
        /// Where the empty buffer came from
        reason: String,
    },

    /// Density target of one bit per zero bytes.
    #[error("Density target must be at least one bit per byte, got one bit per {one_bit_per_n_bytes} bytes")]
    InvalidDensity {
        /// Requested bytes of heap per expected set bit
        one_bit_per_n_bytes: u64,
    },

    /// Text that does not describe a byte quantity.
    #[error("Cannot parse byte quantity {input:?}: {reason}")]
    InvalidByteQuantity {
        /// Text as given
        input: String,
        /// What went wrong
        reason: String,
    },

    /// A derived count or byte total does not fit in 64 bits.
    #[error("{quantity} overflows 64 bits")]
    Overflow {
        /// Which total overflowed
        quantity: String,
    },
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
