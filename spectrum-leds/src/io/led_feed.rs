//! LED frame feed out of a pixel exchange.
//!
//! The transmitter always sends the most recently published pixel buffer.
//! When the main loop is slower than the strip, the same frame is simply
//! sent again; when it is faster, intermediate frames are never shown.

use core::ptr::NonNull;

use super::transfer::TransferControl;
use crate::exchange::Consumer;

/// Interrupt-side half of the LED path.
///
/// Owns the pixel exchange [`Consumer`]. Dropping a running feed halts the
/// engine before the held slot is released.
pub struct LedFeed<'a, C>
where
    C: TransferControl<u32>,
{
    control: C,
    consumer: Consumer<'a, u32>,
    running: bool,
}

impl<'a, C> LedFeed<'a, C>
where
    C: TransferControl<u32>,
{
    pub fn new(control: C, consumer: Consumer<'a, u32>) -> Self {
        LedFeed {
            control,
            consumer,
            running: false,
        }
    }

    /// Send the freshest pixel buffer and keep sending. Idempotent.
    pub fn start(&mut self) -> Result<(), C::Error> {
        if self.running {
            return Ok(());
        }
        let slot = NonNull::from(self.consumer.acquire_for_read());
        self.control.arm(slot)?;
        self.control.enable_interrupt();
        self.running = true;
        log::info!("led feed started: {} pixels", self.consumer.slot_size());
        Ok(())
    }

    /// Completion interrupt handler.
    ///
    /// Swaps the buffer just sent for the freshest one and re-arms.
    /// O(1), never blocks.
    pub fn on_transfer_complete(&mut self) -> Result<(), C::Error> {
        let slot = NonNull::from(self.consumer.acquire_for_read());
        self.control.acknowledge();
        self.control.resync();
        self.control.arm(slot)
    }

    /// Halt the engine, then give back the slot it was reading.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.control.halt();
        self.consumer.release();
        self.running = false;
        log::info!("led feed stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Pixel frames published but never sent.
    pub fn skipped_frames(&self) -> u32 {
        self.consumer.overwritten()
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }
}

impl<C> Drop for LedFeed<'_, C>
where
    C: TransferControl<u32>,
{
    fn drop(&mut self) {
        self.stop();
    }
}
