//! Streaming polyphase convolution driver.
//!
//! A [`Resampler`] advances a fractional read position through per-channel
//! input history, evaluating one polyphase filter (or a linear blend of two
//! neighbouring ones) per output frame. The drive ratio is supplied per
//! call, so it may change between calls; that is the asynchronous-rate
//! (ASRC) case, where the caller measures clock drift, reads
//! [`position`](Resampler::position) back between calls, and nudges the
//! ratio to keep the two clocks locked.
//!
//! Input is consumed in lockstep with the read position: a frame is pulled
//! from the caller's buffer only once the integer part of the position
//! reaches it. Output stops at whichever runs out first, input or output
//! capacity, and the call reports both counts in [`ProcessResult`]; calling
//! again with the remaining frames continues bit-exactly, regardless of how
//! the stream is partitioned.
//!
//! No allocation, blocking, or logging happens in
//! [`process_interleaved`](Resampler::process_interleaved); all buffers are
//! sized at construction.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::delay::DelayLine;
use crate::error::{ResampleError, Result};
use crate::filter_bank::{BankParams, FilterBank};

/// Frame counts reported by one `process` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// Input frames pulled from the caller's buffer. May be fewer than
    /// provided; the remainder must be offered again on the next call.
    pub input_consumed: usize,
    /// Output frames written.
    pub output_generated: usize,
}

/// Streaming resampler: filter bank, per-channel history, and a fractional
/// read position.
///
/// Not safe for concurrent use on one instance; independent instances are
/// independent, and may share one [`FilterBank`] through
/// [`with_bank`](Resampler::with_bank).
#[derive(Clone, Debug)]
pub struct Resampler {
    bank: Arc<FilterBank>,
    channels: usize,
    delays: Vec<DelayLine>,
    /// Monotonic read position in input-sample units. Never rebased, so the
    /// value reported to ASRC feedback loops stays exact.
    position: f64,
    /// Read position relative to the delay-line buffers. Shrinks every time
    /// the histories slide, which keeps it bounded for arbitrarily long
    /// streams.
    offset: f64,
    /// Copied out of the bank so the inner loop branches without touching
    /// it.
    interpolate: bool,
}

#[inline]
fn dot(taps: &[f32], window: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    for (c, s) in taps.iter().zip(window) {
        acc += c * s;
    }
    acc
}

impl Resampler {
    /// Build a resampler together with its own filter bank.
    pub fn new(channels: usize, params: BankParams) -> Result<Self> {
        let bank = FilterBank::new(params)?;
        Self::with_bank(channels, Arc::new(bank))
    }

    /// Build a resampler over an existing (shared) bank.
    pub fn with_bank(channels: usize, bank: Arc<FilterBank>) -> Result<Self> {
        if !(1..=32).contains(&channels) {
            return Err(ResampleError::InvalidChannelCount(channels));
        }
        let taps = bank.num_taps();
        let delays = (0..channels).map(|_| DelayLine::new(taps)).collect();
        Ok(Self {
            channels,
            delays,
            position: 0.0,
            offset: 0.0,
            interpolate: bank.subsample_interpolate(),
            bank,
        })
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// The bank this resampler reads from.
    pub fn bank(&self) -> &FilterBank {
        &self.bank
    }

    /// Current read position in input-sample units.
    ///
    /// Non-decreasing across [`process_interleaved`] calls; grows without
    /// bound over the life of the stream.
    ///
    /// [`process_interleaved`]: Resampler::process_interleaved
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Shift the read position forward by `delta` input samples.
    ///
    /// Called once after construction with `T/2 + phase_shift` to cancel
    /// the bank's group delay, lining output frame 0 up with input frame 0
    /// (modulo the user phase). `delta` must keep the position nonnegative.
    pub fn advance_position(&mut self, delta: f64) {
        debug_assert!(self.offset + delta >= 0.0);
        self.position += delta;
        self.offset += delta;
    }

    /// Zero all channel histories and return the position to 0.
    pub fn reset(&mut self) {
        for d in &mut self.delays {
            d.reset();
        }
        self.position = 0.0;
        self.offset = 0.0;
    }

    /// Resample interleaved `input` into `output` at `ratio` output frames
    /// per input frame.
    ///
    /// Both slice lengths must be multiples of the channel count; frame
    /// counts are taken from them. Writes as many output frames as the
    /// capacity and the buffered input allow. Zero frames either way is a
    /// valid outcome, not an error: offer the unconsumed input again (and/or
    /// a fresh output buffer) on the next call.
    pub fn process_interleaved(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        ratio: f64,
    ) -> Result<ProcessResult> {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(ResampleError::InvalidRatio(ratio));
        }
        debug_assert_eq!(input.len() % self.channels, 0);
        debug_assert_eq!(output.len() % self.channels, 0);

        let in_frames = input.len() / self.channels;
        let out_capacity = output.len() / self.channels;
        let step = 1.0 / ratio;
        let taps = self.bank.num_taps();
        let num_filters = self.bank.num_filters();

        let mut consumed = 0usize;
        let mut generated = 0usize;

        while generated < out_capacity {
            // Pull input until the history covers the window at the current
            // offset, sliding the buffers down when they fill up.
            let mut start = self.offset as usize;
            while self.delays[0].filled() < start + taps {
                if self.delays[0].filled() == self.delays[0].capacity() {
                    let discard = start.min(self.delays[0].filled());
                    for d in &mut self.delays {
                        d.rebase(discard);
                    }
                    self.offset -= discard as f64;
                    start -= discard;
                    continue;
                }
                if consumed == in_frames {
                    break;
                }
                for (ch, d) in self.delays.iter_mut().enumerate() {
                    d.push(input[consumed * self.channels + ch]);
                }
                consumed += 1;
            }
            if self.delays[0].filled() < start + taps {
                break; // starved for input
            }

            let frac = self.offset - start as f64;
            let phase = frac * num_filters as f64;
            // frac < 1, but the product can round up onto F itself; clamp
            // so the blend lands on the sentinel row instead.
            let k0 = (phase as usize).min(num_filters - 1);
            let taps0 = self.bank.filter(k0);
            if self.interpolate {
                let alpha = (phase - k0 as f64) as f32;
                let taps1 = self.bank.filter(k0 + 1);
                for (ch, d) in self.delays.iter().enumerate() {
                    let window = d.window(start);
                    let y0 = dot(taps0, window);
                    let y1 = dot(taps1, window);
                    output[generated * self.channels + ch] = y0 + alpha * (y1 - y0);
                }
            } else {
                for (ch, d) in self.delays.iter().enumerate() {
                    output[generated * self.channels + ch] = dot(taps0, d.window(start));
                }
            }

            generated += 1;
            self.position += step;
            self.offset += step;
        }

        Ok(ProcessResult {
            input_consumed: consumed,
            output_generated: generated,
        })
    }
}
