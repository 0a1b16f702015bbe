//! Frame to spectrum-bin conversion.

use alloc::boxed::Box;
use core::ops::Range;

use num_complex::Complex32;

use super::condition::smooth_neighbours;
use super::fft::FftPlan;
use super::samples::combine_stereo_24;
use super::window::Envelope;
use crate::block::reserve;
use crate::config::{Config, FftVariant, SampleLayout};
use crate::constants::{MAX_USABLE_FREQ, MIN_USABLE_FREQ};
use crate::error::{Error, Result};

/// Write `|spectrum[i]| * 2 / N` into `bins[i]` for the first `N / 2` points.
pub fn magnitude(spectrum: &[Complex32], bins: &mut [f32]) {
    debug_assert_eq!(bins.len() * 2, spectrum.len());
    let scale = 2.0 / spectrum.len() as f32;
    for (bin, x) in bins.iter_mut().zip(spectrum.iter()) {
        *bin = x.norm() * scale;
    }
}

/// Turns raw audio frames into `N / 2` magnitude bins.
///
/// Every buffer is reserved in [`SpectrumEngine::new`]; processing a frame
/// never allocates. The stages can be driven one at a time or all at once
/// with [`SpectrumEngine::process`]:
///
/// ```text
/// load_frame ─► apply_window ─► transform ─► magnitude
///    (raw → f32, gain)           (FFT)       (|X|·2/N, smoothing)
/// ```
pub struct SpectrumEngine {
    plan: FftPlan,
    envelope: Option<Envelope>,
    variant: FftVariant,
    layout: SampleLayout,
    /// Raw word to unit-range factor, gain included.
    scale: f32,
    smoothing: f32,
    /// Channel-combined words; empty for mono input.
    mono: Box<[i32]>,
    samples: Box<[f32]>,
    spectrum: Box<[Complex32]>,
    bins: Box<[f32]>,
}

impl SpectrumEngine {
    /// Build the transform tables, envelope and work buffers for `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let n = config.sample_count;
        let plan = FftPlan::new(n)?;
        if config.full_scale <= 0 {
            return Err(Error::ZeroLength { what: "sample full scale" });
        }
        if !config.gain.is_finite() || config.gain <= 0.0 {
            return Err(Error::InvalidGain(config.gain));
        }
        if !(0.0..1.0).contains(&config.smoothing_factor) {
            return Err(Error::InvalidSmoothing(config.smoothing_factor));
        }

        let mut full_scale = config.full_scale as f32;
        let mono_len = match config.layout {
            SampleLayout::Mono => 0,
            SampleLayout::StereoPacked24 => {
                full_scale *= 2.0;
                n
            }
        };

        let engine = SpectrumEngine {
            envelope: Envelope::new(config.window, n)?,
            variant: config.variant,
            layout: config.layout,
            scale: config.gain / full_scale,
            smoothing: config.smoothing_factor,
            mono: reserve(mono_len, |_| 0)?,
            samples: reserve(n, |_| 0.0)?,
            spectrum: reserve(n, |_| Complex32::new(0.0, 0.0))?,
            bins: reserve(n / 2, |_| 0.0)?,
            plan,
        };
        log::debug!(
            "spectrum engine: {} points, {} stages, {:?}, window {:?}",
            n,
            engine.plan.stages(),
            engine.variant,
            config.window,
        );
        Ok(engine)
    }

    /// Frame length `N`.
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    /// Number of output bins, `N / 2`.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn plan(&self) -> &FftPlan {
        &self.plan
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Float work buffer, for the conditioning stages in
    /// [`condition`](super::condition).
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Convert one raw frame to unit-range floats with gain applied.
    ///
    /// `raw` holds [`Config::words_per_frame`] words.
    pub fn load_frame(&mut self, raw: &[i32]) {
        let scale = self.scale;
        let words: &[i32] = match self.layout {
            SampleLayout::Mono => raw,
            SampleLayout::StereoPacked24 => {
                combine_stereo_24(raw, &mut self.mono);
                &self.mono
            }
        };
        debug_assert_eq!(words.len(), self.samples.len());
        for (sample, &word) in self.samples.iter_mut().zip(words.iter()) {
            *sample = word as f32 * scale;
        }
    }

    /// Multiply the work buffer by the configured envelope, if any.
    pub fn apply_window(&mut self) {
        if let Some(envelope) = &self.envelope {
            envelope.apply(&mut self.samples);
        }
    }

    /// Run the FFT over the work buffer. The result is in natural order.
    pub fn transform(&mut self) -> &[Complex32] {
        for (x, &s) in self.spectrum.iter_mut().zip(self.samples.iter()) {
            *x = Complex32::new(s, 0.0);
        }
        self.plan.process(&mut self.spectrum, self.variant);
        &self.spectrum
    }

    /// Extract bins from the last transform.
    ///
    /// With a non-zero smoothing factor `f`, each bin becomes
    /// `f * previous + (1 - f) * current`.
    pub fn magnitude(&mut self) -> &[f32] {
        let f = self.smoothing;
        if f == 0.0 {
            magnitude(&self.spectrum, &mut self.bins);
        } else {
            let scale = 2.0 / self.spectrum.len() as f32;
            for (bin, x) in self.bins.iter_mut().zip(self.spectrum.iter()) {
                *bin = f * *bin + (1.0 - f) * x.norm() * scale;
            }
        }
        &self.bins
    }

    /// Smooth the bins across frequency, each bin pulled towards its
    /// lower neighbour by `factor`. `0` is a no-op.
    pub fn smooth_bins(&mut self, factor: f32) {
        smooth_neighbours(&mut self.bins, factor);
    }

    /// Divide the bins by the largest non-DC bin. Silence is left at zero.
    pub fn normalize_spectrum(&mut self) {
        let peak = self.bins[1..].iter().fold(0.0f32, |acc, &b| acc.max(b));
        if peak > 0.0 {
            for bin in self.bins.iter_mut() {
                *bin /= peak;
            }
        }
    }

    /// Bins whose centre frequency lies in the band a small MEMS microphone
    /// picks up reliably, for a frame sampled at `sample_rate`.
    ///
    /// The pipeline maps only this range when [`Config::band_limit`] is set.
    pub fn usable_band(&self, sample_rate: u32) -> Range<usize> {
        usable_band(self.len(), sample_rate)
    }

    /// Full per-frame path: load, window, transform, magnitude.
    pub fn process(&mut self, raw: &[i32]) -> &[f32] {
        self.load_frame(raw);
        self.apply_window();
        self.transform();
        self.magnitude()
    }

    /// Zero the smoothing history.
    pub fn reset(&mut self) {
        self.bins.fill(0.0);
    }
}

/// Bin range covering `MIN_USABLE_FREQ..=MAX_USABLE_FREQ` for an `n`-point
/// frame at `sample_rate`. Clamped to `0..n / 2`.
pub fn usable_band(n: usize, sample_rate: u32) -> Range<usize> {
    let bins = n / 2;
    if sample_rate == 0 {
        return 0..0;
    }
    let rate = sample_rate as u64;
    let n = n as u64;
    let low = (MIN_USABLE_FREQ as u64 * n).div_ceil(rate) as usize;
    let high = (MAX_USABLE_FREQ as u64 * n / rate) as usize + 1;
    let high = high.min(bins);
    low.min(high)..high
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Window;
    use crate::spectrum::condition;
    use core::f32::consts::PI;

    fn config(n: usize) -> Config {
        Config {
            sample_count: n,
            full_scale: 1 << 20,
            ..Config::default()
        }
    }

    fn tone(n: usize, bin: usize, amplitude: f32, full_scale: i32) -> [i32; 64] {
        let mut raw = [0i32; 64];
        for (t, word) in raw.iter_mut().take(n).enumerate() {
            let phase = 2.0 * PI * (bin * t) as f32 / n as f32;
            *word = (amplitude * libm::cosf(phase) * full_scale as f32) as i32;
        }
        raw
    }

    #[test]
    fn rejects_bad_length() {
        assert_eq!(
            SpectrumEngine::new(&config(48)).err(),
            Some(Error::InvalidSize(48))
        );
    }

    #[test]
    fn rejects_bad_gain() {
        for gain in [f32::NAN, f32::INFINITY, 0.0, -1.0] {
            let cfg = Config { gain, ..config(8) };
            assert!(matches!(
                SpectrumEngine::new(&cfg).err(),
                Some(Error::InvalidGain(_))
            ));
        }
    }

    #[test]
    fn single_tone_lands_in_its_bin() {
        let cfg = config(8);
        let mut engine = SpectrumEngine::new(&cfg).unwrap();
        let raw = tone(8, 2, 0.5, cfg.full_scale);
        let bins = engine.process(&raw[..8]);
        assert_eq!(bins.len(), 4);
        assert!((bins[2] - 0.5).abs() < 1e-4, "peak {}", bins[2]);
        for (k, &b) in bins.iter().enumerate() {
            if k != 2 {
                assert!(b < 1e-4, "bin {k} = {b}");
            }
        }
    }

    #[test]
    fn variants_agree() {
        let mut dit_cfg = config(64);
        dit_cfg.window = Window::Hann;
        let mut dif_cfg = dit_cfg.clone();
        dif_cfg.variant = FftVariant::DecimationInFrequency;

        let mut dit = SpectrumEngine::new(&dit_cfg).unwrap();
        let mut dif = SpectrumEngine::new(&dif_cfg).unwrap();

        let mut raw = tone(64, 5, 0.3, dit_cfg.full_scale);
        for (t, word) in raw.iter_mut().enumerate() {
            *word += ((t * 7919) % 1000) as i32 * 100;
        }
        let a = dit.process(&raw);
        let b = dif.process(&raw);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "{x} vs {y}");
        }
    }

    #[test]
    fn gain_scales_bins() {
        let mut cfg = config(8);
        cfg.gain = 2.0;
        let mut engine = SpectrumEngine::new(&cfg).unwrap();
        let raw = tone(8, 1, 0.25, cfg.full_scale);
        let bins = engine.process(&raw[..8]);
        assert!((bins[1] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn stereo_words_are_combined() {
        let mut cfg = config(8);
        cfg.layout = SampleLayout::StereoPacked24;
        cfg.full_scale = 1 << 20;
        let mut engine = SpectrumEngine::new(&cfg).unwrap();

        // half-scale left and right average to 0.5
        let word = (1 << 19) << 7;
        let raw = [word; 16];
        engine.load_frame(&raw);
        assert!(engine.samples().iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn smoothing_blends_with_previous_frame() {
        let mut cfg = config(8);
        cfg.smoothing_factor = 0.5;
        let mut engine = SpectrumEngine::new(&cfg).unwrap();
        let raw = tone(8, 2, 0.5, cfg.full_scale);

        let first = engine.process(&raw[..8])[2];
        assert!((first - 0.25).abs() < 1e-4);
        let second = engine.process(&raw[..8])[2];
        assert!((second - 0.375).abs() < 1e-4);

        let silence = [0i32; 8];
        let third = engine.process(&silence)[2];
        assert!((third - 0.1875).abs() < 1e-4);

        engine.reset();
        assert!(engine.bins().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn silence_stays_silent() {
        let mut engine = SpectrumEngine::new(&config(64)).unwrap();
        let raw = [0i32; 64];
        for _ in 0..10 {
            assert!(engine.process(&raw).iter().all(|&b| b == 0.0));
        }
        engine.normalize_spectrum();
        assert!(engine.bins().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn normalize_spectrum_ignores_dc() {
        let mut engine = SpectrumEngine::new(&config(8)).unwrap();
        let mut raw = tone(8, 1, 0.25, 1 << 20);
        for word in raw.iter_mut().take(8) {
            *word += 1 << 19;
        }
        engine.process(&raw[..8]);
        engine.normalize_spectrum();
        let bins = engine.bins();
        assert!((bins[1] - 1.0).abs() < 1e-5);
        assert!(bins[0] > 1.0);
    }

    #[test]
    fn conditioning_runs_on_work_buffer() {
        let mut engine = SpectrumEngine::new(&config(8)).unwrap();
        let raw = tone(8, 2, 0.25, 1 << 20);
        engine.load_frame(&raw[..8]);
        condition::normalize_peak(engine.samples_mut());
        engine.transform();
        let bins = engine.magnitude();
        assert!((bins[2] - 1.0).abs() < 1e-4);

        // clipping keeps only the positive half-cycles
        engine.load_frame(&raw[..8]);
        condition::normalize_peak(engine.samples_mut());
        condition::clip(engine.samples_mut());
        assert!(engine.samples().iter().all(|&s| (0.0..=1.0).contains(&s)));
        assert_eq!(engine.samples()[2], 0.0);
        assert!((engine.samples()[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn smooth_bins_spreads_a_peak_upward() {
        let cfg = config(8);
        let mut engine = SpectrumEngine::new(&cfg).unwrap();
        let raw = tone(8, 1, 0.5, cfg.full_scale);
        engine.process(&raw[..8]);

        engine.smooth_bins(0.0);
        assert!((engine.bins()[1] - 0.5).abs() < 1e-4);
        assert!(engine.bins()[2] < 1e-4);

        engine.smooth_bins(0.5);
        let bins = engine.bins();
        assert!(bins[0] < 1e-4);
        assert!((bins[1] - 0.25).abs() < 1e-4);
        assert!((bins[2] - 0.125).abs() < 1e-4);
        assert!((bins[3] - 0.0625).abs() < 1e-4);
    }

    #[test]
    fn usable_band_bounds() {
        assert_eq!(usable_band(64, 44_100), 1..9);
        assert_eq!(usable_band(1024, 44_100), 2..140);
        assert_eq!(usable_band(8, 0), 0..0);
        // a very low rate puts 6 kHz past Nyquist
        assert_eq!(usable_band(64, 8_000), 1..32);
    }
}
