//! # spectrum-leds
//!
//! A `no_std` core for audio-reactive LED strips: microphone frames go in,
//! one color per LED comes out, once per audio frame. Every buffer is
//! reserved at construction; nothing allocates while frames flow.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Setup | [`config`] / [`error`] / [`constants`] | Startup configuration and its validation |
//! | Exchange | [`exchange`] | Wait-free freshest-wins frame relay between contexts |
//! | DSP | [`spectrum`] | Windowing, radix-2 FFT (DIT and DIF), magnitude bins |
//! | Color | [`color`] / [`mapper`] | HSV to packed GRBA, bins to pixels |
//! | I/O | [`io`] | Microphone capture and LED feed interrupt adapters (feature-gated) |
//! | Loop | [`pipeline`] | Per-frame sequencing and frame statistics |
//!
//! ## Quick start
//!
//! ```ignore
//! use spectrum_leds::config::Config;
//! use spectrum_leds::pipeline::{Exchanges, Visualizer};
//!
//! let config = Config::default();
//! let mut exchanges = Exchanges::new(&config)?;
//! let mut visualizer = Visualizer::new(config)?;
//!
//! let (mic_side, mut audio) = exchanges.audio.split();
//! let (mut pixels, led_side) = exchanges.leds.split();
//!
//! // Interrupt context owns `mic_side` and `led_side`; the main loop runs:
//! loop {
//!     visualizer.step(&mut audio, &mut pixels);
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `peripherals` | yes | [`io`] adapters and blocking frame wait (requires `embedded-hal`) |
//! | `serde` | no | `Serialize`/`Deserialize` for [`config::Config`] |
//!
//! ## Frame parameters
//!
//! - **Frame length:** 64 samples ([`constants::DEFAULT_SAMPLE_COUNT`])
//! - **Sample rate:** 44 100 Hz ([`constants::DEFAULT_SAMPLE_RATE`])
//! - **Sample format:** 24-bit signed, in `i32` words
//! - **Strip length:** 300 pixels ([`constants::DEFAULT_PIXEL_COUNT`])

#![no_std]

extern crate alloc;

pub mod constants;
pub mod error;
pub mod config;
mod block;
pub mod exchange;
pub mod spectrum;
pub mod color;
pub mod mapper;
pub mod pipeline;

#[cfg(feature = "peripherals")]
pub mod io;

pub use config::Config;
pub use error::{Error, Result};
