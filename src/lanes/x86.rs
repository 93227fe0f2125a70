//! SSE and AVX lane groups.
//!
//! Both are only compiled when the target enables the instruction set
//! (`sse2` is part of the x86_64 baseline, `avx` needs `-C target-cpu` or
//! `-C target-feature=+avx`), which is what makes the intrinsic calls below
//! sound.

use std::arch::x86_64::*;
use std::ops::{Add, Div, Mul, Sub};

use super::Lanes;

/// Four lanes in an SSE register.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Sse(__m128);

impl Lanes for Sse {
    const LANES: usize = 4;
    const NAME: &'static str = "sse";

    type Mask = __m128;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        // SAFETY: sse2 is enabled for this compilation.
        Self(unsafe { _mm_set1_ps(value) })
    }

    #[inline(always)]
    fn ramp(start: f32, step: f32) -> Self {
        // SAFETY: sse2 is enabled for this compilation.
        Self(unsafe {
            _mm_setr_ps(
                start,
                start + 1.0 * step,
                start + 2.0 * step,
                start + 3.0 * step,
            )
        })
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> __m128 {
        // Ordered compare: NaN lanes are false.
        // SAFETY: sse2 is enabled for this compilation.
        unsafe { _mm_cmplt_ps(self.0, rhs.0) }
    }

    #[inline(always)]
    fn add_where(self, mask: __m128, value: Self) -> Self {
        // SAFETY: sse2 is enabled for this compilation.
        Self(unsafe { _mm_add_ps(self.0, _mm_and_ps(mask, value.0)) })
    }

    #[inline(always)]
    fn any(mask: __m128) -> bool {
        // SAFETY: sse2 is enabled for this compilation.
        unsafe { _mm_movemask_ps(mask) != 0 }
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        assert_eq!(out.len(), Self::LANES);
        // SAFETY: `out` holds exactly four floats; the store is unaligned.
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) }
    }
}

macro_rules! impl_sse_op {
    ($trait:ident, $method:ident, $intrinsic:ident) => {
        impl $trait for Sse {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                // SAFETY: sse2 is enabled for this compilation.
                Self(unsafe { $intrinsic(self.0, rhs.0) })
            }
        }
    };
}

impl_sse_op!(Add, add, _mm_add_ps);
impl_sse_op!(Sub, sub, _mm_sub_ps);
impl_sse_op!(Mul, mul, _mm_mul_ps);
impl_sse_op!(Div, div, _mm_div_ps);

/// Eight lanes in an AVX register.
#[cfg(target_feature = "avx")]
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Avx(__m256);

#[cfg(target_feature = "avx")]
impl Lanes for Avx {
    const LANES: usize = 8;
    const NAME: &'static str = "avx";

    type Mask = __m256;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        // SAFETY: avx is enabled for this compilation.
        Self(unsafe { _mm256_set1_ps(value) })
    }

    #[inline(always)]
    fn ramp(start: f32, step: f32) -> Self {
        // SAFETY: avx is enabled for this compilation.
        Self(unsafe {
            _mm256_setr_ps(
                start,
                start + 1.0 * step,
                start + 2.0 * step,
                start + 3.0 * step,
                start + 4.0 * step,
                start + 5.0 * step,
                start + 6.0 * step,
                start + 7.0 * step,
            )
        })
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> __m256 {
        // SAFETY: avx is enabled for this compilation.
        unsafe { _mm256_cmp_ps::<_CMP_LT_OS>(self.0, rhs.0) }
    }

    #[inline(always)]
    fn add_where(self, mask: __m256, value: Self) -> Self {
        // SAFETY: avx is enabled for this compilation.
        Self(unsafe { _mm256_add_ps(self.0, _mm256_and_ps(mask, value.0)) })
    }

    #[inline(always)]
    fn any(mask: __m256) -> bool {
        // SAFETY: avx is enabled for this compilation.
        unsafe { _mm256_movemask_ps(mask) != 0 }
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        assert_eq!(out.len(), Self::LANES);
        // SAFETY: `out` holds exactly eight floats; the store is unaligned.
        unsafe { _mm256_storeu_ps(out.as_mut_ptr(), self.0) }
    }
}

#[cfg(target_feature = "avx")]
macro_rules! impl_avx_op {
    ($trait:ident, $method:ident, $intrinsic:ident) => {
        impl $trait for Avx {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                // SAFETY: avx is enabled for this compilation.
                Self(unsafe { $intrinsic(self.0, rhs.0) })
            }
        }
    };
}

#[cfg(target_feature = "avx")]
impl_avx_op!(Add, add, _mm256_add_ps);
#[cfg(target_feature = "avx")]
impl_avx_op!(Sub, sub, _mm256_sub_ps);
#[cfg(target_feature = "avx")]
impl_avx_op!(Mul, mul, _mm256_mul_ps);
#[cfg(target_feature = "avx")]
impl_avx_op!(Div, div, _mm256_div_ps);
