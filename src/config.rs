//! Evaluation parameters.

use crate::{
    error::{Error, Result},
    lanes::{self, Lanes},
};

/// Iteration counts stay exact in an `f32` accumulator up to 2^24.
pub const MAX_ITERATIONS_LIMIT: u32 = 1 << 24;

/// How many pixels are pushed through the escape-time loop together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LaneWidth {
    /// One pixel at a time.
    Scalar,
    X4,
    X8,
    X16,
    /// The widest vector unit enabled at compile time (AVX, SSE, NEON, or scalar).
    #[default]
    Native,
}

impl LaneWidth {
    pub fn lanes(self) -> usize {
        match self {
            LaneWidth::Scalar => lanes::Scalar::LANES,
            LaneWidth::X4 => lanes::Portable::<4>::LANES,
            LaneWidth::X8 => lanes::Portable::<8>::LANES,
            LaneWidth::X16 => lanes::Portable::<16>::LANES,
            LaneWidth::Native => lanes::Native::LANES,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub max_iterations: u32,
    /// Squared escape radius.
    pub divergence_threshold: f32,
    pub lane_width: LaneWidth,
    /// Size of a dedicated worker pool for parallel evaluation. `None` uses
    /// rayon's global pool.
    pub threads: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            divergence_threshold: 4.0,
            lane_width: LaneWidth::Native,
            threads: None,
        }
    }
}

impl Config {
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_divergence_threshold(mut self, divergence_threshold: f32) -> Self {
        self.divergence_threshold = divergence_threshold;
        self
    }

    pub fn with_lane_width(mut self, lane_width: LaneWidth) -> Self {
        self.lane_width = lane_width;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// One worker per physical core. Hyperthreads on the same core share its
    /// vector units, so they add little to this workload.
    pub fn with_physical_core_threads(self) -> Self {
        self.with_threads(num_cpus::get_physical())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS_LIMIT {
            return Err(Error::InvalidArgument(format!(
                "max_iterations must be in 1..={}, got {}",
                MAX_ITERATIONS_LIMIT, self.max_iterations
            )));
        }
        if !(self.divergence_threshold.is_finite() && self.divergence_threshold > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "divergence_threshold must be positive and finite, got {}",
                self.divergence_threshold
            )));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidArgument(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
