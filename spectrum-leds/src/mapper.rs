//! Spectrum bins to LED pixels.
//!
//! `M` bins are stretched or squeezed onto `P` pixels:
//!
//! | Case | Pixel `p` |
//! |------|-----------|
//! | `M == P` | `color(bins[p])` |
//! | `M != P` | `color(bins[i]·(1−f)) + color(bins[i+1]·f)`, where `i + f = p·M/P` |
//!
//! The blend adds channel bytes without saturation (see [`Grba::blend`]),
//! which brightens transitions between neighbouring bins. A neighbour past
//! the last bin counts as silence.

use crate::color::Grba;
use crate::config::{Brightness, Config};
use crate::error::{Error, Result};

/// Converts magnitude bins into packed pixel colors.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMapper {
    pixel_count: usize,
    hue_span: f32,
    brightness: Brightness,
}

impl PixelMapper {
    /// Mapper for `config.pixel_count` pixels.
    pub fn new(config: &Config) -> Result<Self> {
        if config.pixel_count == 0 {
            return Err(Error::ZeroLength { what: "pixel buffer" });
        }
        if !(240.0..=360.0).contains(&config.hue_span) {
            return Err(Error::InvalidHueSpan(config.hue_span));
        }
        Ok(PixelMapper {
            pixel_count: config.pixel_count,
            hue_span: config.hue_span,
            brightness: config.brightness,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Color for one magnitude. Out-of-range input (including NaN) is
    /// clamped, never rejected.
    pub fn color(&self, magnitude: f32) -> Grba {
        let m = if magnitude > 0.0 { magnitude.min(1.0) } else { 0.0 };
        let value = match self.brightness {
            Brightness::Linear => m,
            Brightness::Squared => m * m,
        };
        Grba::from_hsv(m * self.hue_span, 1.0, value)
    }

    /// Fill `pixels` from `bins`.
    ///
    /// `pixels` holds [`pixel_count`](Self::pixel_count) words. An empty
    /// `bins` paints every pixel black.
    pub fn map(&self, bins: &[f32], pixels: &mut [u32]) {
        debug_assert_eq!(pixels.len(), self.pixel_count);
        let bin_count = bins.len();

        if bin_count == 0 {
            pixels.fill(Grba::BLACK.0);
            return;
        }

        if bin_count == pixels.len() {
            for (pixel, &bin) in pixels.iter_mut().zip(bins.iter()) {
                *pixel = self.color(bin).0;
            }
            return;
        }

        let pitch = bin_count as f32 / pixels.len() as f32;
        for (p, pixel) in pixels.iter_mut().enumerate() {
            let index = p as f32 * pitch;
            let i = (index as usize).min(bin_count - 1);
            let f = index - i as f32;
            let next = bins.get(i + 1).copied().unwrap_or(0.0);
            let color = self.color(bins[i] * (1.0 - f)).blend(self.color(next * f));
            *pixel = color.0;
        }
    }
}
