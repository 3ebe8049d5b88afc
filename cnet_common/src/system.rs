//! Analysis configuration: the machine a network is sized for.

use serde::Serialize;

use crate::bytes::ByteQuantity;
use crate::consts::DEFAULT_WORD_BYTES;
use crate::error::{ModelError, ModelResult};

/// Heap size, processor count and word size of the system being modelled.
///
/// Fields are private so that every `Config` in existence has passed
/// validation. Layers and networks hold it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    heap_bytes: ByteQuantity,
    num_processors: u64,
    word_bytes: ByteQuantity,
}

impl Config {
    /// Create a configuration with the default 8-byte word.
    ///
    /// # Errors
    ///
    /// See [`Config::with_word_bytes`].
    pub fn new(heap_bytes: ByteQuantity, num_processors: u64) -> ModelResult<Self> {
        Self::with_word_bytes(heap_bytes, num_processors, DEFAULT_WORD_BYTES)
    }

    /// Create a configuration with an explicit word size.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidConfig` if:
    /// - `heap_bytes` is zero
    /// - `num_processors` is zero
    /// - `word_bytes` is zero
    pub fn with_word_bytes(
        heap_bytes: ByteQuantity,
        num_processors: u64,
        word_bytes: ByteQuantity,
    ) -> ModelResult<Self> {
        let invalid = |reason: &str| ModelError::InvalidConfig {
            reason: reason.to_string(),
        };
        if heap_bytes.is_zero() {
            return Err(invalid("heap_bytes must be positive"));
        }
        if num_processors == 0 {
            return Err(invalid("num_processors must be at least 1"));
        }
        if word_bytes.is_zero() {
            return Err(invalid("word_bytes must be positive"));
        }
        Ok(Self {
            heap_bytes,
            num_processors,
            word_bytes,
        })
    }

    /// Total heap size.
    #[inline]
    pub fn heap_bytes(&self) -> ByteQuantity {
        self.heap_bytes
    }

    /// Number of processors feeding the network.
    #[inline]
    pub fn num_processors(&self) -> u64 {
        self.num_processors
    }

    /// Heap word size.
    #[inline]
    pub fn word_bytes(&self) -> ByteQuantity {
        self.word_bytes
    }
}
