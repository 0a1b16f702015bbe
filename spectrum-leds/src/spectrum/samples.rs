//! Raw word to sample conversion.
//!
//! ## Stereo 24-bit word format
//!
//! An I2S MEMS microphone shifts its 24-bit sample out one bit clock after
//! the word-select edge, so each 32-bit word reads:
//!
//! ```text
//!  bit 31   30 ............ 7   6 ...... 0
//!  ┌─────┬──────────────────┬────────────┐
//!  │ pad │ 24-bit sample    │ don't care │
//!  └─────┴──────────────────┴────────────┘
//! ```
//!
//! `(word << 1) >> 8` (arithmetic) recovers the signed sample.

/// Extract the signed 24-bit sample from one I2S word.
#[inline(always)]
pub fn sample_24(word: i32) -> i32 {
    word.wrapping_shl(1) >> 8
}

/// Sum left and right channels of interleaved stereo words into mono.
///
/// `words` holds `left, right` pairs; the result spans twice the range of a
/// single channel.
///
/// # Panics
///
/// Debug-asserts that `words` holds exactly two words per output sample.
pub fn combine_stereo_24(words: &[i32], mono: &mut [i32]) {
    debug_assert_eq!(words.len(), mono.len() * 2);
    for (out, pair) in mono.iter_mut().zip(words.chunks_exact(2)) {
        *out = sample_24(pair[0]) + sample_24(pair[1]);
    }
}
