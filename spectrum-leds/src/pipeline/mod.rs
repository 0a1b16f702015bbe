//! Per-frame sequencing of the main loop.
//!
//! ```text
//!  MicCapture ─► audio Swapchain ─► Visualizer::step ─► pixel Swapchain ─► LedFeed
//!   (ISR)                          SpectrumEngine
//!                                  then PixelMapper
//! ```
//!
//! The main loop is the only context that runs the transform and the
//! mapper. It always works on the most recent audio frame; when it falls
//! behind, older frames are dropped rather than queued.
//!
//! ## Usage
//!
//! ```ignore
//! let config = Config::default();
//! let mut exchanges = Exchanges::new(&config)?;
//! let mut visualizer = Visualizer::new(config)?;
//!
//! let (mic_side, mut audio) = exchanges.audio.split();
//! let (mut pixels, led_side) = exchanges.leds.split();
//! // hand `mic_side` to MicCapture and `led_side` to LedFeed
//!
//! loop {
//!     visualizer.step_blocking(&mut audio, &mut pixels, &mut delay, 50);
//! }
//! ```

use core::ops::Range;

use crate::config::Config;
use crate::error::Result;
use crate::exchange::{Consumer, Producer, Swapchain};
use crate::mapper::PixelMapper;
use crate::spectrum::SpectrumEngine;

#[cfg(feature = "peripherals")]
use embedded_hal::delay::DelayNs;

/// The two frame exchanges of the pipeline.
pub struct Exchanges {
    /// Raw audio words, one frame per slot.
    pub audio: Swapchain<i32>,
    /// Packed pixels, one strip per slot.
    pub leds: Swapchain<u32>,
}

impl Exchanges {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Exchanges {
            audio: Swapchain::new(config.slot_count, config.words_per_frame())?,
            leds: Swapchain::new(config.slot_count, config.pixel_count)?,
        })
    }
}

/// Running counters, refreshed on every processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Audio frames turned into pixels.
    pub frames: u32,
    /// Audio frames overwritten before the main loop got to them.
    pub audio_dropped: u32,
    /// Pixel frames overwritten before the LED feed sent them.
    pub led_dropped: u32,
}

/// SpectrumEngine followed by PixelMapper.
pub struct Visualizer {
    config: Config,
    engine: SpectrumEngine,
    mapper: PixelMapper,
    /// Bins handed to the mapper.
    band: Range<usize>,
    stats: FrameStats,
}

impl Visualizer {
    /// Validate `config` and reserve every buffer the main loop needs.
    pub fn new(config: Config) -> Result<Self> {
        if let Err(err) = config.validate() {
            log::error!("invalid configuration: {}", err);
            return Err(err);
        }
        let engine = SpectrumEngine::new(&config)?;
        let mapper = PixelMapper::new(&config)?;
        let band = if config.band_limit {
            engine.usable_band(config.sample_rate)
        } else {
            0..engine.bin_count()
        };
        if band.is_empty() {
            log::warn!(
                "usable band is empty at {} Hz, the strip stays dark",
                config.sample_rate
            );
        }

        if config.sample_count < 64 {
            log::warn!(
                "{}-point frames give only {} bins for {} pixels",
                config.sample_count,
                config.bin_count(),
                config.pixel_count
            );
        }
        log::info!(
            "visualizer: {} samples @ {} Hz -> {} pixels, frame period {} us",
            config.sample_count,
            config.sample_rate,
            config.pixel_count,
            config.frame_period_us()
        );

        Ok(Visualizer {
            config,
            engine,
            mapper,
            band,
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &SpectrumEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SpectrumEngine {
        &mut self.engine
    }

    pub fn mapper(&self) -> &PixelMapper {
        &self.mapper
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Turn one raw audio frame into one pixel buffer.
    pub fn render(&mut self, frame: &[i32], pixels: &mut [u32]) {
        let bins = self.engine.process(frame);
        self.mapper.map(&bins[self.band.clone()], pixels);
        self.stats.frames = self.stats.frames.wrapping_add(1);
    }

    /// Process the freshest audio frame, if one arrived since the last step,
    /// and publish the resulting pixels. Returns whether a frame was processed.
    ///
    /// Never waits.
    pub fn step(&mut self, audio: &mut Consumer<'_, i32>, leds: &mut Producer<'_, u32>) -> bool {
        let Some(frame) = audio.try_acquire_fresh() else {
            return false;
        };
        self.render(frame, leds.acquire_for_write());
        leds.publish();

        self.stats.audio_dropped = audio.overwritten();
        self.stats.led_dropped = leds.overwritten();
        log::trace!(
            "frame {}: audio dropped {}, led dropped {}",
            self.stats.frames,
            self.stats.audio_dropped,
            self.stats.led_dropped
        );
        true
    }

    /// [`step`](Self::step), polling every `poll_us` microseconds for at
    /// most one frame period until a fresh audio frame arrives.
    #[cfg(feature = "peripherals")]
    pub fn step_blocking<D: DelayNs>(
        &mut self,
        audio: &mut Consumer<'_, i32>,
        leds: &mut Producer<'_, u32>,
        delay: &mut D,
        poll_us: u32,
    ) -> bool {
        let poll_us = poll_us.max(1);
        let mut waited = 0u32;
        loop {
            if self.step(audio, leds) {
                return true;
            }
            if waited >= self.config.frame_period_us() {
                return false;
            }
            delay.delay_us(poll_us);
            waited = waited.saturating_add(poll_us);
        }
    }
}
