//! NEON lane groups. NEON is mandatory on aarch64.

use std::arch::aarch64::*;
use std::ops::{Add, Div, Mul, Sub};

use super::Lanes;

#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Neon(float32x4_t);

impl Lanes for Neon {
    const LANES: usize = 4;
    const NAME: &'static str = "neon";

    type Mask = uint32x4_t;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        // SAFETY: neon is enabled for this compilation.
        Self(unsafe { vdupq_n_f32(value) })
    }

    #[inline(always)]
    fn ramp(start: f32, step: f32) -> Self {
        let lanes = [
            start,
            start + 1.0 * step,
            start + 2.0 * step,
            start + 3.0 * step,
        ];
        // SAFETY: `lanes` holds four floats.
        Self(unsafe { vld1q_f32(lanes.as_ptr()) })
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> uint32x4_t {
        // SAFETY: neon is enabled for this compilation.
        unsafe { vcltq_f32(self.0, rhs.0) }
    }

    #[inline(always)]
    fn add_where(self, mask: uint32x4_t, value: Self) -> Self {
        // SAFETY: neon is enabled for this compilation.
        Self(unsafe {
            let masked = vandq_u32(mask, vreinterpretq_u32_f32(value.0));
            vaddq_f32(self.0, vreinterpretq_f32_u32(masked))
        })
    }

    #[inline(always)]
    fn any(mask: uint32x4_t) -> bool {
        // SAFETY: neon is enabled for this compilation.
        unsafe { vmaxvq_u32(mask) != 0 }
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        assert_eq!(out.len(), Self::LANES);
        // SAFETY: `out` holds exactly four floats.
        unsafe { vst1q_f32(out.as_mut_ptr(), self.0) }
    }
}

macro_rules! impl_neon_op {
    ($trait:ident, $method:ident, $intrinsic:ident) => {
        impl $trait for Neon {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                // SAFETY: neon is enabled for this compilation.
                Self(unsafe { $intrinsic(self.0, rhs.0) })
            }
        }
    };
}

impl_neon_op!(Add, add, vaddq_f32);
impl_neon_op!(Sub, sub, vsubq_f32);
impl_neon_op!(Mul, mul, vmulq_f32);
impl_neon_op!(Div, div, vdivq_f32);
