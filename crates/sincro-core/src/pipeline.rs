//! Fixed-ratio conversion pipeline: optional biquad pre-filter, resampler,
//! optional biquad post-filter.
//!
//! [`Pipeline`] is the wiring layer a host uses for whole-stream conversion
//! (a file converter, an offline renderer): it picks the embedded-lowpass
//! cutoff for the bank, places the anti-alias biquad cascade on the correct
//! side of the resampler, primes the read position so the filter group delay
//! cancels, and drives blocks through the kernel. Hosts doing asynchronous
//! rate conversion use [`Resampler`] directly instead, since they need to
//! vary the ratio per call.
//!
//! Unlike the raw kernel, [`process`](Pipeline::process) always consumes its
//! whole input: the biquad cascades are stateful, so no frame may pass
//! through them twice. Output goes to a growable buffer; after the last
//! input block, [`drain`](Pipeline::drain) pushes zero frames through the
//! chain to flush the group delay, ending the stream at exactly
//! `round(input_frames * ratio)` frames.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::biquad::LowpassCascade;
use crate::error::{ResampleError, Result};
use crate::filter_bank::{BankParams, lowpass_ratio};
use crate::resampler::Resampler;
use crate::window::WindowFunction;

/// Everything a host decides before conversion starts.
#[derive(Clone, Copy, Debug)]
pub struct PipelineParams {
    /// Interleaved channel count, `1..=32`.
    pub channels: usize,
    /// Taps per filter: a multiple of 4 in `4..=1024`.
    pub num_taps: usize,
    /// Fractional phases in the bank, `2..=1024`.
    pub num_filters: usize,
    /// Window for the sinc design.
    pub window: WindowFunction,
    /// Blend adjacent bank rows for phases finer than `1/F`.
    pub subsample_interpolate: bool,
    /// Output rate over input rate. Fixed for the life of the pipeline.
    pub ratio: f64,
    /// Optional extra lowpass, as a fraction in `(0, 1]` of the lower of
    /// the two Nyquist frequencies. Downsampling applies an anti-alias
    /// lowpass regardless; this narrows it (or, when upsampling, requests
    /// one at all).
    pub lowpass: Option<f64>,
    /// Add a two-section Butterworth cascade before (downsampling) or after
    /// (upsampling) the resampler for extra stopband margin.
    pub biquad_filter: bool,
    /// Sub-sample phase shift in `(-1, 1)`, added to the group-delay
    /// compensation.
    pub phase_shift: f64,
    /// Linear output gain. Folded into the biquad cascade when one is
    /// active, applied to the output samples otherwise.
    pub gain: f64,
    /// Streaming block size in frames; sizes the scratch buffers.
    pub block_frames: usize,
}

/// Default streaming block size in frames.
pub const DEFAULT_BLOCK_FRAMES: usize = 4096;

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            channels: 1,
            num_taps: 256,
            num_filters: 256,
            window: WindowFunction::default(),
            subsample_interpolate: true,
            ratio: 1.0,
            lowpass: None,
            biquad_filter: false,
            phase_shift: 0.0,
            gain: 1.0,
            block_frames: DEFAULT_BLOCK_FRAMES,
        }
    }
}

/// A configured conversion chain with its scratch buffers.
#[derive(Clone, Debug)]
pub struct Pipeline {
    pre: Option<LowpassCascade>,
    resampler: Resampler,
    post: Option<LowpassCascade>,
    channels: usize,
    ratio: f64,
    /// 1.0 whenever a cascade already carries the gain.
    output_gain: f32,
    scratch_in: Vec<f32>,
    scratch_out: Vec<f32>,
    frames_in: u64,
    frames_out: u64,
}

impl Pipeline {
    /// Validate `params`, design the bank, and prime the read position by
    /// `T/2 + phase_shift`.
    pub fn new(params: PipelineParams) -> Result<Self> {
        if !(params.ratio.is_finite() && params.ratio > 0.0) {
            return Err(ResampleError::InvalidRatio(params.ratio));
        }
        if !(params.phase_shift > -1.0 && params.phase_shift < 1.0) {
            return Err(ResampleError::InvalidPhaseShift(params.phase_shift));
        }
        if params.block_frames == 0 {
            return Err(ResampleError::InvalidBlockSize(params.block_frames));
        }
        if let Some(lp) = params.lowpass {
            if !(lp > 0.0 && lp <= 1.0) {
                return Err(ResampleError::InvalidCutoff(lp));
            }
        }

        let ratio = params.ratio;
        let user_lp = params.lowpass.unwrap_or(1.0);
        let guard = lowpass_ratio(params.num_taps, if ratio < 1.0 { ratio } else { 0.0 });

        // Downsampling always embeds an anti-alias lowpass just below the
        // target Nyquist; upsampling only filters on request.
        let (include_lowpass, cutoff) = if ratio < 1.0 {
            (true, guard * ratio * user_lp)
        } else if params.lowpass.is_some() {
            (true, guard * user_lp)
        } else {
            (false, 1.0)
        };

        let mut resampler = Resampler::new(
            params.channels,
            BankParams {
                num_filters: params.num_filters,
                num_taps: params.num_taps,
                cutoff,
                window: params.window,
                include_lowpass,
                subsample_interpolate: params.subsample_interpolate,
            },
        )?;
        resampler.advance_position(params.num_taps as f64 / 2.0 + params.phase_shift);

        let (pre, post) = if !params.biquad_filter {
            (None, None)
        } else if ratio < 1.0 {
            let c = guard * ratio * user_lp / 2.0;
            (Some(LowpassCascade::new(c, params.channels, params.gain)), None)
        } else {
            let c = guard * user_lp / (2.0 * ratio);
            (None, Some(LowpassCascade::new(c, params.channels, params.gain)))
        };
        let output_gain = if params.biquad_filter {
            1.0
        } else {
            params.gain as f32
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            num_taps = params.num_taps,
            num_filters = params.num_filters,
            ratio,
            cutoff,
            include_lowpass,
            biquad = params.biquad_filter,
            "pipeline configured"
        );

        let samples = params.block_frames * params.channels;
        Ok(Self {
            pre,
            resampler,
            post,
            channels: params.channels,
            ratio,
            output_gain,
            scratch_in: vec![0.0; samples],
            scratch_out: vec![0.0; samples],
            frames_in: 0,
            frames_out: 0,
        })
    }

    /// The fixed conversion ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Input frames accepted so far (drain padding excluded).
    pub fn frames_in(&self) -> u64 {
        self.frames_in
    }

    /// Output frames emitted so far.
    pub fn frames_out(&self) -> u64 {
        self.frames_out
    }

    /// Current read position of the inner resampler, in input samples.
    pub fn position(&self) -> f64 {
        self.resampler.position()
    }

    /// Convert interleaved `input`, appending to `output`. All input frames
    /// are consumed. Returns the number of frames appended.
    pub fn process(&mut self, input: &[f32], output: &mut Vec<f32>) -> Result<usize> {
        debug_assert_eq!(input.len() % self.channels, 0);
        let appended = self.feed(input, output)?;
        self.frames_in += (input.len() / self.channels) as u64;
        self.frames_out += appended as u64;
        Ok(appended)
    }

    /// Flush the group delay with zero padding, stopping the stream at
    /// exactly `round(frames_in * ratio)` total output frames. Returns the
    /// number of frames appended. Call once, after the last `process`.
    pub fn drain(&mut self, output: &mut Vec<f32>) -> Result<usize> {
        let expected = to_frames(self.frames_in, self.ratio);
        let block = self.scratch_in.len() / self.channels;
        let mut appended = 0usize;

        // Zero frames staged through the pre-cascade, exactly like real
        // input. `pending` counts the staged frames not yet consumed.
        let mut pending = 0usize;
        let mut offset = 0usize;
        let mut fed = 0usize;
        // The read position trails the newest input by the group delay plus
        // at most one output step, which bounds the padding ever needed.
        let limit = self.resampler.bank().num_taps() * 2 + block + (1.0 / self.ratio) as usize;

        while self.frames_out < expected {
            // Capping the capacity at the remaining frame budget means the
            // stream ends exactly on `expected`, with the read position to
            // match.
            let want = ((expected - self.frames_out) as usize).min(block);
            let res = {
                let input = &self.scratch_in[offset..offset + pending * self.channels];
                let out_slice = &mut self.scratch_out[..want * self.channels];
                self.resampler.process_interleaved(input, out_slice, self.ratio)?
            };
            self.flush_produced(res.output_generated, output);
            appended += res.output_generated;
            self.frames_out += res.output_generated as u64;
            offset += res.input_consumed * self.channels;
            pending -= res.input_consumed;

            if pending == 0 && res.output_generated < want {
                if fed >= limit {
                    break; // padding budget exhausted; should not happen
                }
                self.scratch_in.fill(0.0);
                if let Some(pre) = &mut self.pre {
                    pre.process_interleaved(&mut self.scratch_in);
                }
                offset = 0;
                pending = block;
                fed += block;
            }
        }
        Ok(appended)
    }

    /// Run one buffer through pre-filter, resampler, post-filter and gain,
    /// consuming every frame of it.
    fn feed(&mut self, input: &[f32], output: &mut Vec<f32>) -> Result<usize> {
        let mut appended = 0usize;
        for chunk in input.chunks(self.scratch_in.len()) {
            let buf = &mut self.scratch_in[..chunk.len()];
            buf.copy_from_slice(chunk);
            if let Some(pre) = &mut self.pre {
                pre.process_interleaved(buf);
            }

            let mut offset = 0usize; // samples of the chunk already consumed
            loop {
                let res = self.resampler.process_interleaved(
                    &self.scratch_in[offset..chunk.len()],
                    &mut self.scratch_out,
                    self.ratio,
                )?;
                debug_assert!(
                    offset == chunk.len() || res.input_consumed > 0 || res.output_generated > 0
                );

                self.flush_produced(res.output_generated, output);
                appended += res.output_generated;

                offset += res.input_consumed * self.channels;
                if offset == chunk.len() && res.output_generated < self.scratch_out.len() / self.channels {
                    break;
                }
            }
        }
        Ok(appended)
    }

    /// Post-filter, apply gain, and append the first `generated` frames of
    /// the output scratch.
    fn flush_produced(&mut self, generated: usize, output: &mut Vec<f32>) {
        let produced = &mut self.scratch_out[..generated * self.channels];
        if let Some(post) = &mut self.post {
            post.process_interleaved(produced);
        }
        if self.output_gain != 1.0 {
            for s in produced.iter_mut() {
                *s *= self.output_gain;
            }
        }
        output.extend_from_slice(produced);
    }
}

/// Whole output frames expected for `frames` input frames at `ratio`.
fn to_frames(frames: u64, ratio: f64) -> u64 {
    libm::round(frames as f64 * ratio) as u64
}
