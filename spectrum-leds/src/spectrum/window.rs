//! Precomputed sidelobe-suppression envelopes.

use alloc::boxed::Box;
use core::f32::consts::PI;

use crate::block::reserve;
use crate::config::Window;
use crate::error::Result;

/// Envelope coefficients for one frame length.
pub struct Envelope {
    coeffs: Box<[f32]>,
}

impl Envelope {
    /// Precompute `kind` over `len` samples. `Window::None` yields `None`.
    pub fn new(kind: Window, len: usize) -> Result<Option<Self>> {
        let step = PI / len as f32;
        let coeffs = match kind {
            Window::None => return Ok(None),
            Window::HalfSine => reserve(len, |i| libm::sinf(step * i as f32))?,
            Window::Hann => reserve(len, |i| {
                0.5 * (1.0 + libm::cosf(2.0 * step * i as f32 - PI))
            })?,
        };
        Ok(Some(Envelope { coeffs }))
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coeffs
    }

    /// Multiply each sample by its coefficient.
    pub fn apply(&self, samples: &mut [f32]) {
        debug_assert_eq!(samples.len(), self.coeffs.len());
        for (sample, &c) in samples.iter_mut().zip(self.coeffs.iter()) {
            *sample *= c;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_builds_nothing() {
        assert!(Envelope::new(Window::None, 64).unwrap().is_none());
    }

    #[test]
    fn half_sine_shape() {
        let env = Envelope::new(Window::HalfSine, 8).unwrap().unwrap();
        let c = env.coefficients();
        assert_eq!(c[0], 0.0);
        assert!((c[4] - 1.0).abs() < 1e-6);
        assert!((c[2] - c[6]).abs() < 1e-6);
    }

    #[test]
    fn hann_shape() {
        let env = Envelope::new(Window::Hann, 16).unwrap().unwrap();
        let c = env.coefficients();
        assert!(c[0].abs() < 1e-6);
        assert!((c[8] - 1.0).abs() < 1e-6);
        assert!((c[4] - 0.5).abs() < 1e-6);
        assert!(c.iter().all(|&v| (0.0..=1.0 + 1e-6).contains(&v)));
    }

    #[test]
    fn apply_multiplies_in_place() {
        let env = Envelope::new(Window::HalfSine, 4).unwrap().unwrap();
        let mut samples = [2.0f32; 4];
        env.apply(&mut samples);
        assert_eq!(samples[0], 0.0);
        assert!((samples[2] - 2.0).abs() < 1e-6);
    }
}
