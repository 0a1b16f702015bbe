//! Wait-free frame relay between two execution contexts.
//!
//! A [`Swapchain`] owns a fixed arena of equally sized slots. Exactly one
//! [`Producer`] and one [`Consumer`] borrow it at a time:
//!
//! ```text
//!  Producer (e.g. DMA ISR)         shared word          Consumer (main loop)
//! ┌──────────────────────┐   ┌───────────────────┐   ┌─────────────────────┐
//! │ writing slot (owned) │──►│ latest | reading  │──►│ reading slot (held) │
//! │ publish() = 1 CAS    │   │ fresh flag        │   │ acquire() = 1 CAS   │
//! └──────────────────────┘   └───────────────────┘   └─────────────────────┘
//! ```
//!
//! - Publishing never copies data: it swaps slot indices inside one atomic word.
//! - Readers only ever see the most recently published slot (freshest wins);
//!   frames published but never read are dropped, not queued.
//! - Neither side ever waits on the other.

mod swapchain;

pub use swapchain::{Consumer, Producer, Swapchain};
