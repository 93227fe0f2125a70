//! One lane at a time, for targets without a vector unit.

use std::ops::{Add, Div, Mul, Sub};

use super::Lanes;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct Scalar(pub f32);

impl Lanes for Scalar {
    const LANES: usize = 1;
    const NAME: &'static str = "scalar";

    type Mask = bool;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(value)
    }

    #[inline(always)]
    fn ramp(start: f32, _step: f32) -> Self {
        Self(start)
    }

    #[inline(always)]
    fn lt(self, rhs: Self) -> bool {
        self.0 < rhs.0
    }

    #[inline(always)]
    fn add_where(self, mask: bool, value: Self) -> Self {
        if mask {
            Self(self.0 + value.0)
        } else {
            self
        }
    }

    #[inline(always)]
    fn any(mask: bool) -> bool {
        mask
    }

    #[inline(always)]
    fn store(self, out: &mut [f32]) {
        assert_eq!(out.len(), Self::LANES);
        out[0] = self.0;
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Scalar {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self(self.0 $op rhs.0)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);
impl_binary_op!(Mul, mul, *);
impl_binary_op!(Div, div, /);
