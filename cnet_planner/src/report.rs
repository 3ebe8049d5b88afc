//! Text report of a network's geometry and cost.
//!
//! Output shape, per layer:
//!
//! ```text
//!     16 buffers @  4.0 KiB, each covering  2.0 GiB (268435456 words)
//!        32.0 MiB dart board per region
//!        1/262144 full buffer dart board density = 1 bit every 32.0 KiB
//! ```
//!
//! followed by the total buffer count and the total buffer cost as a share of
//! the heap.

use std::fmt;

use cnet_common::bytes::ByteQuantity;

use crate::layer::Layer;
use crate::network::Network;

/// Dartboard density of a full buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Density {
    /// One set bit every `bits_between` bits of heap; `words_per_entry` is
    /// the exact ratio of covered words to buffer entries.
    OneBitEvery {
        /// Covered words per buffer entry.
        words_per_entry: f64,
        /// Whole bits of heap between set bits.
        bits_between: u64,
    },
    /// The buffer cannot hold a single address.
    Empty,
}

/// Derived numbers for one layer of the report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStats {
    /// Buffers in the layer.
    pub num_bufs: u64,
    /// Capacity of one buffer.
    pub buf_bytes: ByteQuantity,
    /// Heap span of one buffer.
    pub seg_bytes: ByteQuantity,
    /// Heap words covered by one buffer.
    pub words: u64,
    /// Size of the dartboard (one bit per word) for one buffer's span.
    pub dartboard_bytes: ByteQuantity,
    /// Density if a full buffer is flushed to the dartboard.
    pub density: Density,
}

impl LayerStats {
    /// Compute the report numbers for `layer`.
    pub fn of(layer: &Layer) -> Self {
        let words = layer.words();
        let buf_len = layer.buf_len();
        let density = if buf_len == 0 {
            Density::Empty
        } else {
            Density::OneBitEvery {
                words_per_entry: words as f64 / buf_len as f64,
                bits_between: words / buf_len,
            }
        };
        Self {
            num_bufs: layer.num_bufs(),
            buf_bytes: layer.buf_bytes(),
            seg_bytes: layer.seg_bytes(),
            words,
            dartboard_bytes: ByteQuantity::new(words / 8),
            density,
        }
    }
}

/// Displayable report of a network.
pub struct Report<'a> {
    network: &'a Network,
}

impl<'a> Report<'a> {
    /// Wrap `network` for rendering.
    pub fn new(network: &'a Network) -> Self {
        Self { network }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.network.strategy())?;

        for layer in self.network {
            let stats = LayerStats::of(layer);
            writeln!(
                f,
                "{:6} buffers @ {:8}, each covering {:8} ({} words)",
                stats.num_bufs, stats.buf_bytes, stats.seg_bytes, stats.words
            )?;
            writeln!(f, "       {} dart board per region", stats.dartboard_bytes)?;
            match stats.density {
                Density::OneBitEvery {
                    words_per_entry,
                    bits_between,
                } => {
                    write!(
                        f,
                        "       1/{} full buffer dart board density = 1 bit every ",
                        significant(words_per_entry)
                    )?;
                    match ByteQuantity::from_bit_count(bits_between) {
                        Ok(bytes) => writeln!(f, "{bytes}")?,
                        Err(_) => writeln!(f, "{bits_between} bits")?,
                    }
                }
                Density::Empty => writeln!(f, "       buffer too small to hold one address")?,
            }
        }

        writeln!(f, "{:6} total buffers", self.network.total_bufs())?;
        writeln!(
            f,
            "{} of buffers ({:.2}% overhead)",
            self.network.total_buf_bytes(),
            100.0 * self.network.overhead_ratio()
        )
    }
}

/// Six significant digits, trailing zeros dropped, switching to an exponent
/// outside `1e-4..1e6`.
fn significant(value: f64) -> String {
    const DIGITS: i32 = 6;

    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let exp = value.abs().log10().floor() as i32;
    if (-4..DIGITS).contains(&exp) {
        let decimals = (DIGITS - 1 - exp).max(0) as usize;
        return trim_zeros(format!("{value:.decimals$}"));
    }

    let text = format!("{:.*e}", (DIGITS - 1) as usize, value);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or_default();
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{sign}{:02}", trim_zeros(mantissa.to_string()), exp.abs())
        }
        None => text,
    }
}

fn trim_zeros(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Render the text report of `network`.
pub fn render_report(network: &Network) -> String {
    Report::new(network).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{fixed_buf_network, FixedBufParams};
    use cnet_common::consts::{GIB, KIB};
    use cnet_common::system::Config;
    use std::sync::Arc;

    #[test]
    fn leaf_stats_of_fixed_network() {
        let network = fixed_buf_network(Config::new(GIB, 8).unwrap(), FixedBufParams::default())
            .unwrap();
        let stats = LayerStats::of(network.leaf());
        assert_eq!(stats.words, 65536);
        assert_eq!(stats.dartboard_bytes, 8 * KIB);
        assert_eq!(
            stats.density,
            Density::OneBitEvery {
                words_per_entry: 32.0,
                bits_between: 32,
            }
        );
    }

    #[test]
    fn tiny_buffers_report_empty_density() {
        let config = Arc::new(Config::new(GIB, 1).unwrap());
        let layer = Layer::new(config, GIB, 1, ByteQuantity::new(2)).unwrap();
        assert_eq!(LayerStats::of(&layer).density, Density::Empty);
    }

    #[test]
    fn report_lines_for_fixed_network() {
        let network = fixed_buf_network(Config::new(GIB, 8).unwrap(), FixedBufParams::default())
            .unwrap();
        let text = render_report(&network);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Fixed buffer network of 4.0 KiB buffers, fan_out=16, fan_in=8"
        );
        // Leaf: 2048 segments of 512 KiB, all 8 processors share.
        let leaf = lines.len() - 5;
        assert_eq!(
            lines[leaf],
            "  2048 buffers @  4.0 KiB, each covering 512.0 KiB (65536 words)"
        );
        assert_eq!(lines[leaf + 1], "       8.0 KiB dart board per region");
        assert_eq!(
            lines[leaf + 2],
            "       1/32 full buffer dart board density = 1 bit every 4 bytes"
        );
        assert!(lines[lines.len() - 2].ends_with(" total buffers"));
        assert!(lines[lines.len() - 1].ends_with("% overhead)"));
    }

    #[test]
    fn ratios_keep_six_significant_digits() {
        assert_eq!(significant(256.0), "256");
        assert_eq!(significant(262144.0), "262144");
        assert_eq!(significant(10.24), "10.24");
        assert_eq!(significant(6144.023437589407), "6144.02");
        assert_eq!(significant(0.5), "0.5");
        assert_eq!(significant(4194304.0), "4.1943e+06");
        assert_eq!(significant(0.00001234), "1.234e-05");
    }

    #[test]
    fn fractional_ratio_is_rounded_in_report() {
        let config = Arc::new(Config::new(GIB, 1).unwrap());
        // 512 words over 50 two-byte entries.
        let layer = Layer::new(config.clone(), 4 * KIB, 1, ByteQuantity::new(100)).unwrap();
        let network = Network::new(
            config,
            crate::network::Strategy::Fixed(FixedBufParams::default()),
            vec![layer],
        )
        .unwrap();
        let text = render_report(&network);
        assert!(
            text.contains("       1/10.24 full buffer dart board density = 1 bit every 10 bits\n"),
            "{text}"
        );
    }

    #[test]
    fn non_byte_density_printed_in_bits() {
        let config = Arc::new(Config::new(GIB, 1).unwrap());
        // 512 words over 50 two-byte entries: 10 bits between set bits.
        let layer = Layer::new(config, 4 * KIB, 1, ByteQuantity::new(100)).unwrap();
        let stats = LayerStats::of(&layer);
        assert_eq!(
            stats.density,
            Density::OneBitEvery {
                words_per_entry: 512.0 / 50.0,
                bits_between: 10,
            }
        );
    }
}
