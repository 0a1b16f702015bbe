//! Interrupt-side peripheral adapters.
//!
//! Each adapter owns one half of a frame exchange and a [`TransferControl`]
//! engine, and does only O(1) bookkeeping inside its completion handler:
//!
//! | Adapter | Exchange half | Completion handler |
//! |---------|---------------|--------------------|
//! | [`MicCapture`] | audio [`Producer`](crate::exchange::Producer) | publish, claim next slot, re-arm |
//! | [`LedFeed`] | pixel [`Consumer`](crate::exchange::Consumer) | take freshest frame, re-arm |
//!
//! ## Teardown
//!
//! [`TransferControl::halt`] masks the interrupt, aborts the transfer and
//! clears a racing completion flag, in that order. Both adapters halt
//! before giving up their slots, and halt on drop, so the exchange
//! borrowed by an adapter is never freed under a live transfer.

pub mod led_feed;
pub mod mic_capture;
pub mod transfer;

pub use led_feed::LedFeed;
pub use mic_capture::{CaptureError, MicCapture};
pub use transfer::TransferControl;
