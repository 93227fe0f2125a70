//! Vectorised, optionally multi-threaded evaluation of the Mandelbrot set's
//! escape-time field.
//!
//! ```
//! use escape_field::{evaluate, Resolution, Window};
//!
//! let window = Window::new(-2.0, 1.0, -1.5, 1.5);
//! let field = evaluate(window, Resolution::new(64, 64), true).unwrap();
//! assert_eq!(field.len(), 64 * 64);
//! assert_eq!(field[32 * 64 + 32], 1.0);
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod lanes;
pub mod window;

pub use buffer::AlignedBuffer;
pub use config::{Config, LaneWidth};
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use window::{Complex, Resolution, Window};

/// Evaluates `window` with [`Config::default`], on rayon's global pool when
/// `parallel` is set.
pub fn evaluate(
    window: Window,
    resolution: Resolution,
    parallel: bool,
) -> Result<AlignedBuffer<f32>> {
    Evaluator::new(Config::default())?.evaluate(window, resolution, parallel)
}
