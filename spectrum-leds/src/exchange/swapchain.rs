//! Slot arena plus the single-word state machine that hands slots between
//! producer and consumer.
//!
//! # Safety Contract
//!
//! - Only ONE context may hold the [`Producer`], only ONE the [`Consumer`].
//!   [`Swapchain::split`] borrows the swapchain mutably, so the type system
//!   enforces this.
//! - Every index move happens in a single compare-and-swap on `state`.
//!   No payload is copied inside it.
//!
//! # Invariants
//!
//! - `writing` (producer-local) never equals `latest` or `reading`.
//! - The consumer only ever moves `reading` to `latest` or to nothing.
//! - Only the producer ever changes `latest`.

use alloc::boxed::Box;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::block::reserve;
use crate::constants::MAX_SLOT_COUNT;
use crate::error::{Error, Result};

const INDEX_MASK: u32 = 0xFF;
const READING_SHIFT: u32 = 8;
const FRESH: u32 = 1 << 16;
const NO_SLOT: u8 = 0xFF;

/// Decoded view of the shared state word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State {
    /// Most recently published slot.
    latest: u8,
    /// Slot held by the consumer, or `NO_SLOT`.
    reading: u8,
    /// `latest` has been published since the consumer last acquired.
    fresh: bool,
}

impl State {
    const fn from_bits(bits: u32) -> Self {
        State {
            latest: (bits & INDEX_MASK) as u8,
            reading: ((bits >> READING_SHIFT) & INDEX_MASK) as u8,
            fresh: bits & FRESH != 0,
        }
    }

    const fn bits(self) -> u32 {
        let fresh = if self.fresh { FRESH } else { 0 };
        self.latest as u32 | ((self.reading as u32) << READING_SHIFT) | fresh
    }
}

/// Fixed set of equally sized buffers relayed from one producer to one consumer.
///
/// Slot 0 starts as the published slot and is zero-filled (`T::default()`),
/// so a read before the first publish yields a default-filled buffer.
pub struct Swapchain<T> {
    storage: Box<[UnsafeCell<T>]>,
    slot_size: usize,
    slot_count: usize,
    state: AtomicU32,
    overwritten: AtomicU32,
}

// SAFETY: T: Send is required because slot contents cross contexts.
// Slot access is partitioned by the state word: the producer only touches
// its `writing` slot and the consumer only its `reading` slot, and the
// invariants above keep those disjoint. AcqRel on every state transition
// orders payload writes before the publish that exposes them.
unsafe impl<T: Send> Sync for Swapchain<T> {}
unsafe impl<T: Send> Send for Swapchain<T> {}

impl<T: Copy + Default> Swapchain<T> {
    /// Reserve `slot_count` slots of `slot_size` elements each.
    ///
    /// This is the only allocation the swapchain ever performs.
    pub fn new(slot_count: usize, slot_size: usize) -> Result<Self> {
        if !(3..=MAX_SLOT_COUNT).contains(&slot_count) {
            return Err(Error::InvalidSlotCount(slot_count));
        }
        if slot_size == 0 {
            return Err(Error::ZeroLength { what: "swapchain slot" });
        }

        let total = slot_count
            .checked_mul(slot_size)
            .ok_or(Error::Allocation { bytes: usize::MAX })?;
        let storage = reserve(total, |_| UnsafeCell::new(T::default()))?;

        log::debug!(
            "swapchain: {} slots x {} elements ({} bytes)",
            slot_count,
            slot_size,
            total * core::mem::size_of::<T>()
        );

        Ok(Swapchain {
            storage,
            slot_size,
            slot_count,
            state: AtomicU32::new(
                State {
                    latest: 0,
                    reading: NO_SLOT,
                    fresh: false,
                }
                .bits(),
            ),
            overwritten: AtomicU32::new(0),
        })
    }
}

impl<T> Swapchain<T> {
    /// Split into the producer and consumer halves.
    ///
    /// Any slot still marked as being read by a previous consumer is released.
    pub fn split(&mut self) -> (Producer<'_, T>, Consumer<'_, T>) {
        let mut state = State::from_bits(*self.state.get_mut());
        state.reading = NO_SLOT;
        *self.state.get_mut() = state.bits();

        let writing = self.next_free(state.latest, state.latest, NO_SLOT);
        let chain: &Swapchain<T> = self;
        (
            Producer { chain, writing },
            Consumer {
                chain,
                holding: false,
            },
        )
    }

    /// Number of slots in the arena.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Elements per slot.
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// Published frames that were replaced before the consumer read them.
    pub fn overwritten(&self) -> u32 {
        self.overwritten.load(Ordering::Relaxed)
    }

    /// First slot after `from` (ring order) that is neither `latest` nor `reading`.
    fn next_free(&self, from: u8, latest: u8, reading: u8) -> u8 {
        let count = self.slot_count as u8;
        let mut candidate = from;
        loop {
            candidate = (candidate + 1) % count;
            if candidate != latest && candidate != reading {
                return candidate;
            }
        }
    }

    /// Raw pointer to the first element of slot `index`.
    fn slot_ptr(&self, index: u8) -> *mut T {
        debug_assert!((index as usize) < self.slot_count);
        // SAFETY: index < slot_count, so the offset stays inside `storage`.
        // UnsafeCell<T> is repr(transparent), so the cells are laid out as [T].
        unsafe {
            UnsafeCell::raw_get(
                self.storage
                    .as_ptr()
                    .add(index as usize * self.slot_size),
            )
        }
    }

    /// # Safety
    /// Caller must own slot `index` (hold it as the reading slot).
    unsafe fn slot(&self, index: u8) -> &[T] {
        unsafe { core::slice::from_raw_parts(self.slot_ptr(index), self.slot_size) }
    }

    /// # Safety
    /// Caller must own slot `index` exclusively (it is the writing slot).
    #[allow(clippy::mut_from_ref)]
    unsafe fn slot_mut(&self, index: u8) -> &mut [T] {
        unsafe { core::slice::from_raw_parts_mut(self.slot_ptr(index), self.slot_size) }
    }
}

/// Writing half of a [`Swapchain`].
///
/// Always owns exactly one slot; [`publish`](Self::publish) hands it over
/// and immediately claims a free one.
pub struct Producer<'a, T> {
    chain: &'a Swapchain<T>,
    writing: u8,
}

impl<'a, T> Producer<'a, T> {
    /// Exclusive access to the slot currently being written.
    ///
    /// Never blocks. Repeated calls return the same slot until the next
    /// [`publish`](Self::publish), so a peripheral can keep writing into it
    /// across interrupts.
    pub fn acquire_for_write(&mut self) -> &mut [T] {
        // SAFETY: `writing` is never `latest` or `reading`, so no other
        // context can observe this slot until it is published.
        unsafe { self.chain.slot_mut(self.writing) }
    }

    /// Mark the written slot as the most recent frame.
    ///
    /// An unread previously published frame is dropped. O(1), no copy.
    pub fn publish(&mut self) {
        let state_word = &self.chain.state;
        let mut current = state_word.load(Ordering::Acquire);
        loop {
            let state = State::from_bits(current);
            let next = State {
                latest: self.writing,
                reading: state.reading,
                fresh: true,
            };
            match state_word.compare_exchange_weak(
                current,
                next.bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if state.fresh {
                        self.chain.overwritten.fetch_add(1, Ordering::Relaxed);
                    }
                    // The consumer can only move to `next.latest` or release,
                    // so the observed `reading` is the only other slot to avoid.
                    self.writing = self.chain.next_free(self.writing, next.latest, state.reading);
                    return;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Index of the slot currently owned for writing.
    pub fn slot_index(&self) -> usize {
        self.writing as usize
    }

    /// Elements per slot.
    pub fn slot_size(&self) -> usize {
        self.chain.slot_size
    }

    /// See [`Swapchain::overwritten`].
    pub fn overwritten(&self) -> u32 {
        self.chain.overwritten()
    }
}

/// Reading half of a [`Swapchain`].
pub struct Consumer<'a, T> {
    chain: &'a Swapchain<T>,
    holding: bool,
}

impl<'a, T> Consumer<'a, T> {
    /// Take the most recently published slot, releasing any slot held before.
    ///
    /// Never blocks. If nothing new has been published since the last call,
    /// the same (still most recent) frame is returned again; before the
    /// very first publish that frame is default-filled.
    pub fn acquire_for_read(&mut self) -> &[T] {
        // Without `fresh_only` the CAS always succeeds.
        let index = self.take_latest(false).unwrap_or(0);
        // SAFETY: the state word now records `index` as the reading slot,
        // which the producer never selects for writing.
        unsafe { self.chain.slot(index) }
    }

    /// Like [`acquire_for_read`](Self::acquire_for_read), but only when a
    /// frame has been published since the previous acquire.
    ///
    /// Returns `None` without touching the held slot otherwise.
    pub fn try_acquire_fresh(&mut self) -> Option<&[T]> {
        let index = self.take_latest(true)?;
        // SAFETY: as in `acquire_for_read`.
        Some(unsafe { self.chain.slot(index) })
    }

    /// The slot acquired last, if it has not been released.
    pub fn held(&self) -> Option<&[T]> {
        let index = self.slot_index()?;
        // SAFETY: the reading slot is ours until released.
        Some(unsafe { self.chain.slot(index as u8) })
    }

    /// Return the held slot to the pool of reclaimable slots.
    pub fn release(&mut self) {
        if !self.holding {
            return;
        }
        let state_word = &self.chain.state;
        let mut current = state_word.load(Ordering::Relaxed);
        loop {
            let mut next = State::from_bits(current);
            next.reading = NO_SLOT;
            match state_word.compare_exchange_weak(
                current,
                next.bits(),
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
        self.holding = false;
    }

    /// Whether a frame has been published since the last acquire.
    pub fn has_fresh(&self) -> bool {
        State::from_bits(self.chain.state.load(Ordering::Acquire)).fresh
    }

    /// Index of the held slot, if any.
    pub fn slot_index(&self) -> Option<usize> {
        if !self.holding {
            return None;
        }
        let state = State::from_bits(self.chain.state.load(Ordering::Relaxed));
        Some(state.reading as usize)
    }

    /// Elements per slot.
    pub fn slot_size(&self) -> usize {
        self.chain.slot_size
    }

    /// See [`Swapchain::overwritten`].
    pub fn overwritten(&self) -> u32 {
        self.chain.overwritten()
    }

    /// Move `reading` onto `latest` in one CAS. With `fresh_only`, gives up
    /// (leaving the state untouched) when nothing new was published.
    fn take_latest(&mut self, fresh_only: bool) -> Option<u8> {
        let state_word = &self.chain.state;
        let mut current = state_word.load(Ordering::Acquire);
        loop {
            let state = State::from_bits(current);
            if fresh_only && !state.fresh {
                return None;
            }
            let next = State {
                latest: state.latest,
                reading: state.latest,
                fresh: false,
            };
            match state_word.compare_exchange_weak(
                current,
                next.bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.holding = true;
                    return Some(state.latest);
                }
                Err(actual) => current = actual,
            }
        }
    }
}
