//! Startup configuration.
//!
//! Resolved once before the pipeline is built and constant afterwards.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HUE_SPAN, DEFAULT_PIXEL_COUNT, DEFAULT_SAMPLE_COUNT, DEFAULT_SAMPLE_RATE,
    DEFAULT_SLOT_COUNT, MAX_SLOT_COUNT, MIC_FULL_SCALE,
};
use crate::error::{Error, Result};

/// Envelope applied to each frame before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Window {
    /// Rectangular window (samples pass through unchanged).
    #[default]
    None,
    /// `sin(pi * i / N)`.
    HalfSine,
    /// Raised cosine `0.5 * (1 + cos(2 pi i / N - pi))`.
    Hann,
}

/// FFT data flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FftVariant {
    /// Bit-reverse first, natural-order output.
    #[default]
    DecimationInTime,
    /// Natural-order input, bit-reversed output that is un-permuted afterwards.
    DecimationInFrequency,
}

/// Word layout of the raw frames the audio source publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleLayout {
    /// One signed sample per word, already aligned to `full_scale`.
    #[default]
    Mono,
    /// Two words (left, right) per sample; each carries a 24-bit value
    /// MSB-aligned after one padding bit, as an I2S MEMS microphone emits it.
    StereoPacked24,
}

/// How a pixel's value channel follows the bin magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Brightness {
    /// `value = magnitude`
    #[default]
    Linear,
    /// `value = magnitude^2`, darker lows for more contrast.
    Squared,
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Samples per audio frame (`N`, power of two).
    pub sample_count: usize,

    /// LEDs on the strip (`P`).
    pub pixel_count: usize,

    /// Microphone sample rate in Hz.
    pub sample_rate: u32,

    /// Word layout of raw audio frames.
    pub layout: SampleLayout,

    /// Absolute value of a full-scale raw sample.
    pub full_scale: i32,

    /// Linear gain applied after normalizing samples to full scale.
    pub gain: f32,

    /// Pre-transform envelope. Off by default.
    pub window: Window,

    /// Temporal smoothing of bins, in `[0, 1)`. `0` keeps no history.
    pub smoothing_factor: f32,

    /// Slots per frame exchange.
    pub slot_count: usize,

    /// FFT data flow.
    pub variant: FftVariant,

    /// Hue reached at full magnitude, in degrees.
    pub hue_span: f32,

    /// Magnitude to value mapping.
    pub brightness: Brightness,

    /// Map only the bins inside the microphone's usable band onto the
    /// strip. Off by default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub band_limit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            pixel_count: DEFAULT_PIXEL_COUNT,
            sample_rate: DEFAULT_SAMPLE_RATE,
            layout: SampleLayout::Mono,
            full_scale: MIC_FULL_SCALE,
            gain: 1.0,
            window: Window::None,
            smoothing_factor: 0.0,
            slot_count: DEFAULT_SLOT_COUNT,
            variant: FftVariant::DecimationInTime,
            hue_span: DEFAULT_HUE_SPAN,
            brightness: Brightness::Linear,
            band_limit: false,
        }
    }
}

impl Config {
    /// Number of spectrum bins produced per frame (`N / 2`).
    pub fn bin_count(&self) -> usize {
        self.sample_count / 2
    }

    /// Raw words per audio frame, i.e. the audio exchange slot size.
    pub fn words_per_frame(&self) -> usize {
        match self.layout {
            SampleLayout::Mono => self.sample_count,
            SampleLayout::StereoPacked24 => self.sample_count * 2,
        }
    }

    /// Duration of one audio frame in microseconds.
    pub fn frame_period_us(&self) -> u32 {
        if self.sample_rate == 0 {
            return 0;
        }
        ((self.sample_count as u64 * 1_000_000) / self.sample_rate as u64) as u32
    }

    /// Check every field, returning the first configuration error found.
    pub fn validate(&self) -> Result<()> {
        if self.sample_count < 2 || !self.sample_count.is_power_of_two() {
            return Err(Error::InvalidSize(self.sample_count));
        }
        if self.pixel_count == 0 {
            return Err(Error::ZeroLength { what: "pixel buffer" });
        }
        if self.sample_rate == 0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.full_scale <= 0 {
            return Err(Error::ZeroLength { what: "sample full scale" });
        }
        if !self.gain.is_finite() || self.gain <= 0.0 {
            return Err(Error::InvalidGain(self.gain));
        }
        if !(0.0..1.0).contains(&self.smoothing_factor) {
            return Err(Error::InvalidSmoothing(self.smoothing_factor));
        }
        if !(3..=MAX_SLOT_COUNT).contains(&self.slot_count) {
            return Err(Error::InvalidSlotCount(self.slot_count));
        }
        if !(240.0..=360.0).contains(&self.hue_span) {
            return Err(Error::InvalidHueSpan(self.hue_span));
        }
        Ok(())
    }
}
