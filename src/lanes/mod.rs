//! Fixed-width groups of `f32` lanes.
//!
//! The evaluator is written once against [`Lanes`] and instantiated per
//! backend. Every backend computes the same IEEE single-precision operations
//! lane by lane, so they differ only in how many pixels move through the loop
//! together.

use std::ops::{Add, Div, Mul, Sub};

mod portable;
mod scalar;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod arm;
#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
mod x86;

pub use portable::Portable;
pub use scalar::Scalar;

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub use arm::Neon;
#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
pub use x86::Avx;
#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
pub use x86::Sse;

/// Widest lane group enabled for the compilation target.
#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
pub type Native = Avx;
#[cfg(all(
    target_arch = "x86_64",
    target_feature = "sse2",
    not(target_feature = "avx")
))]
pub type Native = Sse;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub type Native = Neon;
#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse2"),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
pub type Native = Scalar;

pub trait Lanes:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    const LANES: usize;
    const NAME: &'static str;

    /// Per-lane boolean produced by comparisons.
    type Mask: Copy;

    fn splat(value: f32) -> Self;

    /// `[start, start + step, start + 2 * step, ...]`, each lane computed as
    /// `start + i * step`.
    fn ramp(start: f32, step: f32) -> Self;

    fn lt(self, rhs: Self) -> Self::Mask;

    /// Adds `value` in the lanes where `mask` is set and leaves the rest untouched.
    fn add_where(self, mask: Self::Mask, value: Self) -> Self;

    fn any(mask: Self::Mask) -> bool;

    /// Writes all lanes to `out`, which must hold exactly `LANES` values.
    fn store(self, out: &mut [f32]);
}
