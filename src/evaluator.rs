/*!
Escape-time evaluation of the Mandelbrot set on the CPU.

Each pixel `c` runs `z ← z² + c` from `z = c` and records how many iterations
`|z|²` stayed below the divergence threshold, divided by the iteration budget.
A pixel that never escapes stores exactly `1.0`.

Pixels are processed in lane groups of [`Lanes::LANES`] neighbours along a row.
All lanes of a group share one instruction stream, so a lane that escapes
early can't leave the loop on its own. It keeps iterating with the rest of
the group, but the comparison mask stops it from collecting any more counts.
Once every lane's mask is clear the group's counts can no longer change and
the loop exits early. `|z|²` of an escaped lane grows until it overflows to
infinity or NaN, and both compare false, so an escaped lane never rejoins the
count.

The accumulator holds whole iteration counts, which are exact in `f32` up to
2^24. It is normalised by one division per group at store time. Adding
`1 / max_iterations` on every iteration instead would drift, and a point that
never escapes could end up slightly above or below `1.0`.

Rows don't depend on each other, so with `parallel` set they are handed to
rayon as disjoint `&mut [f32]` chunks of the output. Within a row the groups
run in order: each group's real coordinates are the previous group's plus
`LANES * re_step`.
*/

use log::{debug, trace};
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{
    buffer::{self, AlignedBuffer},
    config::{Config, LaneWidth},
    error::Result,
    lanes::{self, Lanes},
    window::{Resolution, Window},
};

/// Output buffers are never aligned to less than this many bytes.
pub const MIN_ALIGNMENT: usize = 32;

/// Read-only state shared by every row of one evaluation.
#[derive(Clone, Copy, Debug)]
struct Row {
    re_min: f32,
    re_step: f32,
    max_iterations: u32,
    divergence_threshold: f32,
}

pub struct Evaluator {
    config: Config,
    pool: Option<rayon::ThreadPool>,
}

impl Evaluator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let pool = match config.threads {
            Some(threads) => {
                debug!("building evaluator pool with {} threads", threads);
                Some(
                    rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .thread_name(|index| format!("escape-field-{}", index))
                        .build()?,
                )
            }
            None => None,
        };

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluates `window` at `resolution`, one row per task when `parallel` is set.
    pub fn evaluate(
        &self,
        window: Window,
        resolution: Resolution,
        parallel: bool,
    ) -> Result<AlignedBuffer<f32>> {
        match self.config.lane_width {
            LaneWidth::Scalar => self.evaluate_with::<lanes::Scalar>(window, resolution, parallel),
            LaneWidth::X4 => self.evaluate_with::<lanes::Portable<4>>(window, resolution, parallel),
            LaneWidth::X8 => self.evaluate_with::<lanes::Portable<8>>(window, resolution, parallel),
            LaneWidth::X16 => {
                self.evaluate_with::<lanes::Portable<16>>(window, resolution, parallel)
            }
            LaneWidth::Native => self.evaluate_with::<lanes::Native>(window, resolution, parallel),
        }
    }

    fn evaluate_with<L: Lanes>(
        &self,
        window: Window,
        resolution: Resolution,
        parallel: bool,
    ) -> Result<AlignedBuffer<f32>> {
        window.validate()?;
        let len = resolution.validate(L::LANES)?;

        trace!("begin evaluate");
        debug!(
            "evaluating {:?} at {}x{} with {} x{} lanes (parallel: {})",
            window,
            resolution.re_size,
            resolution.im_size,
            L::NAME,
            L::LANES,
            parallel
        );

        let mut output = buffer::Builder::<f32>::new(len)
            .with_label("escape-field")
            .with_alignment((L::LANES * std::mem::size_of::<f32>()).max(MIN_ALIGNMENT))
            .create()?;

        let spacing = window.spacing(resolution);
        let row = Row {
            re_min: window.re_min,
            re_step: spacing.re_step,
            max_iterations: self.config.max_iterations,
            divergence_threshold: self.config.divergence_threshold,
        };
        let im_of = |py: usize| window.im_min + py as f32 * spacing.im_step;

        if parallel {
            let rows = |output: &mut [f32]| {
                output
                    .par_chunks_mut(resolution.re_size)
                    .enumerate()
                    .for_each(|(py, out)| evaluate_row::<L>(&row, im_of(py), out));
            };
            match &self.pool {
                Some(pool) => pool.install(|| rows(&mut output[..])),
                None => rows(&mut output[..]),
            }
        } else {
            output
                .chunks_mut(resolution.re_size)
                .enumerate()
                .for_each(|(py, out)| evaluate_row::<L>(&row, im_of(py), out));
        }

        trace!("end evaluate");

        Ok(output)
    }
}

/// Fills one row of output, `out.len()` being a multiple of `L::LANES`.
#[inline]
fn evaluate_row<L: Lanes>(row: &Row, im: f32, out: &mut [f32]) {
    debug_assert_eq!(out.len() % L::LANES, 0);

    let im_coord = L::splat(im);
    let re_advance = L::splat(row.re_step * L::LANES as f32);
    let threshold = L::splat(row.divergence_threshold);
    let max_iterations = L::splat(row.max_iterations as f32);
    let one = L::splat(1.0);
    let zero = L::splat(0.0);

    let mut re_coord = L::ramp(row.re_min, row.re_step);
    for group in out.chunks_exact_mut(L::LANES) {
        let mut re = re_coord;
        let mut im = im_coord;

        let mut counts = zero;
        for _ in 0..row.max_iterations {
            let re_sq = re * re;
            let im_sq = im * im;
            let re_im = re * im;

            let bounded = (re_sq + im_sq).lt(threshold);
            counts = counts.add_where(bounded, one);
            if !L::any(bounded) {
                break;
            }

            re = re_sq - im_sq + re_coord;
            im = re_im + re_im + im_coord;
        }

        (counts / max_iterations).store(group);

        re_coord = re_coord + re_advance;
    }
}
