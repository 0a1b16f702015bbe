//! Fallible one-shot buffer reservation.
//!
//! Every buffer the pipeline uses is reserved here, once, at construction.
//! Nothing allocates after that.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Reserve `len` elements and initialize element `i` with `init(i)`.
///
/// Fails with [`Error::Allocation`] instead of aborting when the heap
/// cannot satisfy the request.
pub(crate) fn reserve<T>(len: usize, init: impl FnMut(usize) -> T) -> Result<Box<[T]>> {
    let bytes = len.saturating_mul(core::mem::size_of::<T>());
    let mut buffer: Vec<T> = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::Allocation { bytes })?;
    buffer.extend((0..len).map(init));
    Ok(buffer.into_boxed_slice())
}
