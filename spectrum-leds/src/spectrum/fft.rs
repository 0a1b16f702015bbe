//! In-place radix-2 complex FFT with precomputed tables.
//!
//! Both data flows share one [`FftPlan`]:
//!
//! | Variant | Input order | Stage order (sets per stage) | Butterfly |
//! |---------|-------------|------------------------------|-----------|
//! | DIT | bit-reversed | N/2, N/4, .., 1 | `t ± w·b` |
//! | DIF | natural | 1, 2, .., N/2 | `t + b`, `w·(t − b)` |
//!
//! In both, a stage with `sets` sets of `N / (2·sets)` butterflies uses
//! twiddle index `butterfly · sets`.

use alloc::boxed::Box;
use core::f64::consts::PI;

use num_complex::Complex32;

use crate::block::reserve;
use crate::config::FftVariant;
use crate::error::{Error, Result};

/// Reverse the lowest `bit_depth` bits of `value`.
#[inline]
pub fn reverse_bits(value: usize, bit_depth: u32) -> usize {
    if bit_depth == 0 {
        return 0;
    }
    value.reverse_bits() >> (usize::BITS - bit_depth)
}

/// `log2(n)` if `n` is a power of two, `None` otherwise.
#[inline]
pub fn log2_exact(n: usize) -> Option<u32> {
    n.is_power_of_two().then(|| n.trailing_zeros())
}

/// Bit-reversal and twiddle tables for one transform length.
///
/// Built once by [`FftPlan::new`], immutable afterwards.
pub struct FftPlan {
    len: usize,
    bit_depth: u32,
    bit_reverse: Box<[u32]>,
    twiddles: Box<[Complex32]>,
}

impl FftPlan {
    /// Build the tables for an `len`-point transform.
    ///
    /// Fails with [`Error::InvalidSize`] unless `len` is a power of two ≥ 2.
    pub fn new(len: usize) -> Result<Self> {
        let bit_depth = match log2_exact(len) {
            Some(depth) if depth >= 1 => depth,
            _ => return Err(Error::InvalidSize(len)),
        };

        let bit_reverse = reserve(len, |i| reverse_bits(i, bit_depth) as u32)?;
        let twiddles = reserve(len / 2, |k| {
            let angle = -2.0 * PI * k as f64 / len as f64;
            Complex32::new(libm::cos(angle) as f32, libm::sin(angle) as f32)
        })?;

        log::debug!("fft plan: {len} points, {bit_depth} stages");

        Ok(FftPlan {
            len,
            bit_depth,
            bit_reverse,
            twiddles,
        })
    }

    /// Transform length `N`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of butterfly stages, `log2(N)`.
    pub fn stages(&self) -> u32 {
        self.bit_depth
    }

    /// `e^{-2πik/N}` for `k` in `0..N/2`.
    pub fn twiddles(&self) -> &[Complex32] {
        &self.twiddles
    }

    /// `reverse_bits(i, log2(N))` for `i` in `0..N`.
    pub fn bit_reverse_table(&self) -> &[u32] {
        &self.bit_reverse
    }

    /// Reorder `data` into bit-reversed index order, in place.
    pub fn permute(&self, data: &mut [Complex32]) {
        debug_assert_eq!(data.len(), self.len);
        for (i, &rev) in self.bit_reverse.iter().enumerate() {
            let rev = rev as usize;
            // Swap each pair once; fixed points stay.
            if rev > i {
                data.swap(i, rev);
            }
        }
    }

    /// Run the selected variant. Output is always in natural order.
    pub fn process(&self, data: &mut [Complex32], variant: FftVariant) {
        match variant {
            FftVariant::DecimationInTime => self.dit(data),
            FftVariant::DecimationInFrequency => self.dif(data),
        }
    }

    /// Decimation-in-time transform.
    pub fn dit(&self, data: &mut [Complex32]) {
        debug_assert_eq!(data.len(), self.len);
        self.permute(data);

        let half = self.len / 2;
        let mut sets = half;
        while sets >= 1 {
            let butterflies = half / sets;
            for set in 0..sets {
                let offset = set * butterflies * 2;
                for butterfly in 0..butterflies {
                    let top = offset + butterfly;
                    let bottom = top + butterflies;
                    let rotated = self.twiddles[butterfly * sets] * data[bottom];
                    let t = data[top];
                    data[top] = t + rotated;
                    data[bottom] = t - rotated;
                }
            }
            sets >>= 1;
        }
    }

    /// Decimation-in-frequency transform, un-permuted back to natural order.
    pub fn dif(&self, data: &mut [Complex32]) {
        debug_assert_eq!(data.len(), self.len);

        let half = self.len / 2;
        let mut sets = 1;
        while sets <= half {
            let butterflies = half / sets;
            for set in 0..sets {
                let offset = set * butterflies * 2;
                for butterfly in 0..butterflies {
                    let top = offset + butterfly;
                    let bottom = top + butterflies;
                    let t = data[top];
                    let b = data[bottom];
                    data[top] = t + b;
                    data[bottom] = self.twiddles[butterfly * sets] * (t - b);
                }
            }
            sets <<= 1;
        }

        self.permute(data);
    }
}
