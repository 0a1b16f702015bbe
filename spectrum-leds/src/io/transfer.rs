//! Peripheral transfer engine control.

use core::ptr::NonNull;

/// A DMA-style engine that moves one frame of `W` words per transfer and
/// raises a completion interrupt at the end of each.
///
/// Implemented by the board support layer. Every method except
/// [`arm`](Self::arm) is a plain register write and cannot fail.
pub trait TransferControl<W> {
    /// Error type for arming a transfer.
    type Error;

    /// Start a transfer over `buffer`.
    ///
    /// The engine may access `buffer` until the transfer completes or is
    /// aborted.
    fn arm(&mut self, buffer: NonNull<[W]>) -> Result<(), Self::Error>;

    /// Unmask the completion interrupt.
    fn enable_interrupt(&mut self);

    /// Mask the completion interrupt.
    fn disable_interrupt(&mut self);

    /// Cancel any in-flight transfer and wait until the engine is idle.
    fn abort(&mut self);

    /// Clear a pending completion flag.
    fn acknowledge(&mut self);

    /// Re-synchronize the line protocol before the next transfer, e.g. the
    /// reset/latch gap of a WS2812 chain. No-op by default.
    fn resync(&mut self) {}

    /// Quiesce the engine: mask, abort, then clear any completion that
    /// raced the abort. After this returns no completion can fire and the
    /// engine no longer touches the last armed buffer.
    fn halt(&mut self) {
        self.disable_interrupt();
        self.abort();
        self.acknowledge();
    }
}
