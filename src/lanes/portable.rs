//! Plain `[f32; N]` lane groups.
//!
//! Nothing here names an instruction set. The loops have a constant trip
//! count, which LLVM unrolls and turns into whatever vector instructions the
//! target offers.

use std::ops::{Add, Div, Mul, Sub};

use super::Lanes;

#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct Portable<const N: usize>(pub [f32; N]);

impl<const N: usize> Lanes for Portable<N> {
    const LANES: usize = N;
    const NAME: &'static str = "portable";

    type Mask = [bool; N];

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self([value; N])
    }

    #[inline(always)]
    fn ramp(start: f32, step: f32) -> Self {
        Self(std::array::from_fn(|i| start + i as f32 * step))
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> [bool; N] {
        std::array::from_fn(|i| self.0[i] < rhs.0[i])
    }

    #[inline(always)]
    fn add_where(self, mask: [bool; N], value: Self) -> Self {
        Self(std::array::from_fn(|i| {
            if mask[i] {
                self.0[i] + value.0[i]
            } else {
                self.0[i]
            }
        }))
    }

    #[inline(always)]
    fn any(mask: [bool; N]) -> bool {
        mask.iter().any(|lane| *lane)
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        out.copy_from_slice(&self.0);
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<const N: usize> $trait for Portable<N> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self(std::array::from_fn(|i| self.0[i] $op rhs.0[i]))
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);
impl_binary_op!(Mul, mul, *);
impl_binary_op!(Div, div, /);
