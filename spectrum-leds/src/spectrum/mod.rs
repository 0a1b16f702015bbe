//! Audio frame to magnitude spectrum.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`fft`] | Bit reversal, twiddles, DIT and DIF radix-2 transforms |
//! | [`window`] | Half-sine and Hann envelopes |
//! | [`samples`] | Raw I2S word decoding and stereo combination |
//! | [`condition`] | Gain, RMS gate, peak normalize, signed square, clips, neighbour smoothing |
//! | [`engine`] | [`SpectrumEngine`]: the per-frame path tying them together |

pub mod condition;
pub mod engine;
pub mod fft;
pub mod samples;
pub mod window;

pub use engine::{magnitude, usable_band, SpectrumEngine};
pub use fft::{reverse_bits, FftPlan};
pub use window::Envelope;
