//! Per-channel input history for the streaming driver.
//!
//! The convolution reads a contiguous run of the `T` most recent input
//! samples per output frame, so the buffer is linear rather than circular:
//! samples append at the end, and once the read offset has moved past the
//! first half of the buffer the live tail is copied down to the front. The
//! copy touches each input sample once over its lifetime, so the cost stays
//! amortised O(1) per sample.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// History buffer for one channel.
///
/// Freshly constructed (and after [`reset`](DelayLine::reset)) it holds
/// `T - 1` zero samples of pre-history, which lines read offset 0 up with
/// the first pushed sample.
#[derive(Clone, Debug)]
pub(crate) struct DelayLine {
    buf: Vec<f32>,
    filled: usize,
    taps: usize,
}

impl DelayLine {
    pub(crate) fn new(num_taps: usize) -> Self {
        Self {
            buf: vec![0.0; num_taps * 2],
            filled: num_taps - 1,
            taps: num_taps,
        }
    }

    /// Number of valid samples currently buffered.
    #[inline]
    pub(crate) fn filled(&self) -> usize {
        self.filled
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Append one sample. The caller rebases before pushing into a full
    /// buffer.
    #[inline]
    pub(crate) fn push(&mut self, sample: f32) {
        debug_assert!(self.filled < self.buf.len());
        self.buf[self.filled] = sample;
        self.filled += 1;
    }

    /// The `T` contiguous samples starting at `start`.
    #[inline]
    pub(crate) fn window(&self, start: usize) -> &[f32] {
        &self.buf[start..start + self.taps]
    }

    /// Discard the oldest `drop` samples, sliding the rest to the front.
    pub(crate) fn rebase(&mut self, drop: usize) {
        debug_assert!(drop <= self.filled);
        self.buf.copy_within(drop..self.filled, 0);
        self.filled -= drop;
    }

    /// Return to the freshly-constructed state.
    pub(crate) fn reset(&mut self) {
        self.buf.fill(0.0);
        self.filled = self.taps - 1;
    }
}
