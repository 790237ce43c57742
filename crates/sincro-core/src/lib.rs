//! Sincro Core - windowed-sinc polyphase resampling kernel.
//!
//! Converts interleaved multi-channel `f32` audio between arbitrary sample
//! rates, fixed or drifting, with a controllable CPU/RAM footprint. The
//! engine is a bank of precomputed windowed-sinc FIR filters covering the
//! fractional phases of one input sample interval, driven by a streaming
//! convolution loop that walks a fractional read position through
//! per-channel history buffers.
//!
//! # Core Types
//!
//! - [`FilterBank`] / [`BankParams`] - the polyphase tap table (immutable,
//!   shareable between instances)
//! - [`Resampler`] - the streaming driver: per-channel delay lines, a
//!   fractional read position, and a per-call drive ratio
//! - [`Pipeline`] / [`PipelineParams`] - fixed-ratio orchestration: cutoff
//!   policy, optional biquad pre/post cascade, group-delay priming, and
//!   exact end-to-end frame accounting
//! - [`BiquadSection`] / [`LowpassCascade`] - Butterworth lowpass sections
//!   for extra anti-aliasing margin
//!
//! # Asynchronous rate conversion
//!
//! The drive ratio is an argument of
//! [`process_interleaved`](Resampler::process_interleaved), not part of the
//! resampler's state, and [`position`](Resampler::position) exposes the
//! fractional read position between calls. An ASRC loop measures sink-clock
//! drift against that position and adjusts the next call's ratio; output is
//! deterministic for a given sequence of per-call ratios and inputs,
//! however the stream is partitioned.
//!
//! # Example
//!
//! ```rust
//! use sincro_core::{Pipeline, PipelineParams};
//!
//! // Downsample a mono stream from 48 kHz to 32 kHz.
//! let mut pipeline = Pipeline::new(PipelineParams {
//!     channels: 1,
//!     ratio: 32000.0 / 48000.0,
//!     ..PipelineParams::default()
//! })
//! .unwrap();
//!
//! let input = vec![0.0f32; 4800];
//! let mut output = Vec::new();
//! pipeline.process(&input, &mut output).unwrap();
//! pipeline.drain(&mut output).unwrap();
//! assert_eq!(output.len(), 3200);
//! ```
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (it still allocates: bank tables and
//! delay lines are heap-owned, sized at construction). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! sincro-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: no allocation, I/O, or logging on the process path
//! - **Explicit state**: one value per stream, threaded through every call;
//!   nothing process-wide
//! - **Structured failures**: invalid parameters are [`ResampleError`]s at
//!   construction or call entry, never mid-stream panics

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
mod delay;
pub mod error;
pub mod filter_bank;
pub mod pipeline;
pub mod resampler;
pub mod window;

// Re-export main types at crate root
pub use biquad::{BiquadCoefficients, BiquadSection, LowpassCascade, lowpass_coefficients};
pub use error::{ResampleError, Result};
pub use filter_bank::{BankParams, FilterBank, lowpass_ratio};
pub use pipeline::{DEFAULT_BLOCK_FRAMES, Pipeline, PipelineParams};
pub use resampler::{ProcessResult, Resampler};
pub use window::WindowFunction;
