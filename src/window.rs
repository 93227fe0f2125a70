//! Geometry of an evaluation: which part of the complex plane, at what resolution.

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

/// Rectangular region of the complex plane that is sampled.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Window {
    pub re_min: f32,
    pub re_max: f32,
    pub im_min: f32,
    pub im_max: f32,
}

impl Window {
    pub fn new(re_min: f32, re_max: f32, im_min: f32, im_max: f32) -> Self {
        Self {
            re_min,
            re_max,
            im_min,
            im_max,
        }
    }

    /// Rejects non-finite or empty windows.
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.re_min, self.re_max, self.im_min, self.im_max];
        if bounds.iter().any(|bound| !bound.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "window bounds must be finite, got {:?}",
                self
            )));
        }
        if self.re_max <= self.re_min {
            return Err(Error::InvalidArgument(format!(
                "re_max ({}) must be greater than re_min ({})",
                self.re_max, self.re_min
            )));
        }
        if self.im_max <= self.im_min {
            return Err(Error::InvalidArgument(format!(
                "im_max ({}) must be greater than im_min ({})",
                self.im_max, self.im_min
            )));
        }
        Ok(())
    }

    /// Distance between neighbouring samples on each axis.
    pub fn spacing(&self, resolution: Resolution) -> Spacing {
        Spacing {
            re_step: (self.re_max - self.re_min) / resolution.re_size as f32,
            im_step: (self.im_max - self.im_min) / resolution.im_size as f32,
        }
    }

    /**
    Plane coordinate sampled for pixel `(px, py)`.

    Samples sit on the lower-left corner of their pixel: column `px` is
    `re_min + px * re_step` and row `py` is `im_min + py * im_step`. The
    evaluator reaches later lane groups by repeatedly adding `lanes * re_step`,
    so for widths that aren't exactly representable the real part here can
    differ from the kernel's in the last few bits.
    */
    pub fn point(&self, resolution: Resolution, px: usize, py: usize) -> Complex {
        let spacing = self.spacing(resolution);
        Complex {
            re: self.re_min + px as f32 * spacing.re_step,
            im: self.im_min + py as f32 * spacing.im_step,
        }
    }
}

/// Number of samples along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub re_size: usize,
    pub im_size: usize,
}

impl Resolution {
    pub fn new(re_size: usize, im_size: usize) -> Self {
        Self { re_size, im_size }
    }

    /// Checks that the grid is non-empty, that rows split evenly into groups
    /// of `lanes`, and returns the total number of samples.
    pub fn validate(&self, lanes: usize) -> Result<usize> {
        if self.re_size == 0 || self.im_size == 0 {
            return Err(Error::InvalidArgument(format!(
                "resolution must be positive, got {}x{}",
                self.re_size, self.im_size
            )));
        }
        if self.re_size % lanes != 0 {
            return Err(Error::InvalidArgument(format!(
                "re_size ({}) must be a multiple of the lane width ({})",
                self.re_size, lanes
            )));
        }
        self.re_size.checked_mul(self.im_size).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "resolution {}x{} overflows the address space",
                self.re_size, self.im_size
            ))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
    pub re_step: f32,
    pub im_step: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_inverted_windows() {
        assert!(Window::new(-2.0, 1.0, -1.5, 1.5).validate().is_ok());
        assert!(Window::new(1.0, 1.0, -1.5, 1.5).validate().is_err());
        assert!(Window::new(1.0, -2.0, -1.5, 1.5).validate().is_err());
        assert!(Window::new(-2.0, 1.0, 1.5, -1.5).validate().is_err());
        assert!(Window::new(f32::NAN, 1.0, -1.5, 1.5).validate().is_err());
        assert!(Window::new(-2.0, f32::INFINITY, -1.5, 1.5)
            .validate()
            .is_err());
    }

    #[test]
    fn resolution_must_split_into_lane_groups() {
        assert_eq!(Resolution::new(64, 48).validate(8).unwrap(), 64 * 48);
        assert_eq!(Resolution::new(3, 5).validate(1).unwrap(), 15);
        assert!(Resolution::new(0, 48).validate(8).is_err());
        assert!(Resolution::new(64, 0).validate(8).is_err());
        assert!(Resolution::new(60, 48).validate(8).is_err());
        assert!(Resolution::new(usize::MAX - 7, 2).validate(8).is_err());
    }

    #[test]
    fn spacing_and_points() {
        let window = Window::new(-2.0, 1.0, -1.5, 1.5);
        let resolution = Resolution::new(64, 64);
        let spacing = window.spacing(resolution);
        assert_eq!(spacing.re_step, 3.0 / 64.0);
        assert_eq!(spacing.im_step, 3.0 / 64.0);

        assert_eq!(window.point(resolution, 0, 0), Complex::new(-2.0, -1.5));
        assert_eq!(window.point(resolution, 32, 32), Complex::new(-0.5, 0.0));
    }
}
