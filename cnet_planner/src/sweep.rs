//! Design-space sweeps over machine sizes.
//!
//! - [`Sweep`] and [`sweep_report`]: both strategies for 1, 2, 4, ... processors with
//!   1 GiB of heap per processor.
//! - [`OverheadGrid`]: density network overhead across a grid of heap sizes
//!   and processor counts.

use std::fmt;
use std::sync::Arc;

use cnet_common::bytes::ByteQuantity;
use cnet_common::consts::GIB;
use cnet_common::error::ModelResult;
use cnet_common::system::Config;
use tracing::debug;

use crate::builders::{density_network, fixed_buf_network, DensityParams, FixedBufParams};
use crate::network::Network;
use crate::report::Report;

/// `n` terms of the geometric sequence `start, start * factor, ...`.
pub fn exp_range(start: u64, n: usize, factor: u64) -> impl Iterator<Item = u64> {
    std::iter::successors(Some(start), move |&term| term.checked_mul(factor)).take(n)
}

/// Both strategies built for a series of machine sizes.
///
/// Step `k` has `2^k` processors and `2^k` GiB of heap.
#[derive(Debug, Clone)]
pub struct Sweep {
    /// (fixed, density) network pair per step.
    steps: Vec<(Network, Network)>,
}

impl Sweep {
    /// Build both networks for each of `steps` machine sizes.
    ///
    /// # Errors
    ///
    /// Propagates builder errors; none occur with the default parameters.
    pub fn compute(steps: usize) -> ModelResult<Self> {
        let steps = exp_range(1, steps, 2)
            .map(|procs| -> ModelResult<(Network, Network)> {
                let heap = GIB * procs;
                let config = Arc::new(Config::new(heap, procs)?);
                debug!("sweep step: {procs} processors, {heap} heap");

                let fixed = fixed_buf_network(config.clone(), FixedBufParams::default())?;
                let density = density_network(config, DensityParams::default())?;
                Ok((fixed, density))
            })
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Self { steps })
    }

    /// Number of machine sizes.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no machine size was requested.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (fixed, density) in &self.steps {
            let config = fixed.config();
            writeln!(
                f,
                "## {} Ps, {} heap",
                config.num_processors(),
                config.heap_bytes()
            )?;
            writeln!(f, "{}", Report::new(fixed))?;
            writeln!(f, "{}", Report::new(density))?;
        }
        Ok(())
    }
}

/// Reports of both strategies for `steps` machine sizes.
///
/// # Errors
///
/// See [`Sweep::compute`].
pub fn sweep_report(steps: usize) -> ModelResult<String> {
    Ok(Sweep::compute(steps)?.to_string())
}

/// Buffer overhead, in percent of the heap, for every (heap, processors)
/// pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OverheadGrid {
    heaps: Vec<ByteQuantity>,
    processors: Vec<u64>,
    /// Row per heap, column per processor count.
    percent: Vec<Vec<f64>>,
}

impl OverheadGrid {
    /// Build a density network for every cell and record its overhead.
    ///
    /// # Errors
    ///
    /// Propagates the first configuration or builder error.
    pub fn compute(
        heaps: impl IntoIterator<Item = ByteQuantity>,
        processors: impl IntoIterator<Item = u64>,
        params: DensityParams,
    ) -> ModelResult<Self> {
        let heaps: Vec<ByteQuantity> = heaps.into_iter().collect();
        let processors: Vec<u64> = processors.into_iter().collect();

        let percent = heaps
            .iter()
            .map(|&heap| {
                processors
                    .iter()
                    .map(|&procs| -> ModelResult<f64> {
                        let network = density_network(Config::new(heap, procs)?, params)?;
                        Ok(100.0 * network.overhead_ratio())
                    })
                    .collect::<ModelResult<Vec<f64>>>()
            })
            .collect::<ModelResult<Vec<_>>>()?;

        Ok(Self {
            heaps,
            processors,
            percent,
        })
    }

    /// The default grid: heaps `64 MiB * 4^k` and processors `2^k`.
    ///
    /// # Errors
    ///
    /// Propagates builder errors from [`OverheadGrid::compute`]; none occur
    /// for grids that fit in 64 bits.
    pub fn standard(heap_steps: usize, proc_steps: usize) -> ModelResult<Self> {
        let base = 64u64 << 20;
        Self::compute(
            exp_range(base, heap_steps, 4).map(ByteQuantity::new),
            exp_range(1, proc_steps, 2),
            DensityParams::default(),
        )
    }

    /// Overhead percentage of one cell.
    pub fn get(&self, heap_idx: usize, proc_idx: usize) -> Option<f64> {
        self.percent.get(heap_idx)?.get(proc_idx).copied()
    }

    /// Row labels.
    pub fn heaps(&self) -> &[ByteQuantity] {
        &self.heaps
    }

    /// Column labels.
    pub fn processors(&self) -> &[u64] {
        &self.processors
    }
}

impl fmt::Display for OverheadGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>9}", "heap \\ Ps")?;
        for procs in &self.processors {
            write!(f, "  {procs:6}")?;
        }
        writeln!(f)?;

        for (heap, row) in self.heaps.iter().zip(&self.percent) {
            write!(f, "{heap:9}")?;
            for pct in row {
                write!(f, " {pct:6.2}%")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
