//! Microphone frame capture into an audio exchange.
//!
//! ## Flow
//!
//! ```text
//!   I2S RX ──DMA──► writing slot ──publish──► latest ──► main loop
//!                      ▲                                    │
//!                      └────── next free slot ◄─────────────┘
//! ```
//!
//! On every completion interrupt the filled slot is published, the next
//! free slot is claimed and the engine is re-armed on it. No samples are
//! copied; the engine writes straight into exchange slots.
//!
//! ## Usage
//!
//! ```ignore
//! let (producer, consumer) = exchanges.audio.split();
//! let mut mic = MicCapture::new(dma, lr_select, producer);
//! mic.start()?;
//!
//! // In the DMA completion ISR:
//! mic.on_transfer_complete()?;
//! ```

use core::ptr::NonNull;

use embedded_hal::digital::OutputPin;
use thiserror::Error;

use super::transfer::TransferControl;
use crate::exchange::Producer;

/// Failure while starting or re-arming capture.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError<T, P> {
    #[error("transfer engine: {0:?}")]
    Transfer(T),

    #[error("channel select pin: {0:?}")]
    Pin(P),
}

/// Interrupt-side half of the audio path.
///
/// Owns the audio exchange [`Producer`]. Dropping a running capture halts
/// the engine first, so the exchange always outlives the last DMA write.
pub struct MicCapture<'a, C, P>
where
    C: TransferControl<i32>,
    P: OutputPin,
{
    control: C,
    /// L/R word-select input of the microphone. Driven low to pick the left slot.
    select: P,
    producer: Producer<'a, i32>,
    running: bool,
}

impl<'a, C, P> MicCapture<'a, C, P>
where
    C: TransferControl<i32>,
    P: OutputPin,
{
    pub fn new(control: C, select: P, producer: Producer<'a, i32>) -> Self {
        MicCapture {
            control,
            select,
            producer,
            running: false,
        }
    }

    /// Select the channel and arm the first transfer. Idempotent.
    pub fn start(&mut self) -> Result<(), CaptureError<C::Error, P::Error>> {
        if self.running {
            return Ok(());
        }
        self.select.set_low().map_err(CaptureError::Pin)?;
        let slot = NonNull::from(self.producer.acquire_for_write());
        self.control.arm(slot).map_err(CaptureError::Transfer)?;
        self.control.enable_interrupt();
        self.running = true;
        log::info!(
            "mic capture started: {} words per frame, slot {}",
            self.producer.slot_size(),
            self.producer.slot_index()
        );
        Ok(())
    }

    /// Completion interrupt handler.
    ///
    /// Publishes the frame just written, claims the next slot and re-arms.
    /// O(1), never blocks.
    pub fn on_transfer_complete(&mut self) -> Result<(), C::Error> {
        self.producer.publish();
        let slot = NonNull::from(self.producer.acquire_for_write());
        self.control.acknowledge();
        self.control.arm(slot)
    }

    /// Halt the engine. The slot it was writing is left unpublished.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.control.halt();
        self.running = false;
        log::info!("mic capture stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames published but never read.
    pub fn dropped_frames(&self) -> u32 {
        self.producer.overwritten()
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }
}

impl<C, P> Drop for MicCapture<'_, C, P>
where
    C: TransferControl<i32>,
    P: OutputPin,
{
    fn drop(&mut self) {
        self.stop();
    }
}
