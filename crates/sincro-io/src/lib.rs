//! WAV container and sample-conditioning layer for the sincro resampler.
//!
//! The resampling kernel speaks interleaved 32-bit float frames and nothing
//! else; this crate provides both sides of that boundary:
//!
//! - **WAV file I/O**: [`read_wav`] / [`write_wav_float`] /
//!   [`write_wav_pcm`] for loading and saving audio, [`read_wav_info`] for
//!   metadata without sample data
//! - **Sample conditioning**: [`Quantizer`] for the float-to-integer edge,
//!   with TPDF dither and first-order noise shaping
//!
//! Byte-order normalisation is handled by `hound` as part of the container
//! format.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sincro_io::{Quantizer, read_wav, write_wav_pcm, WavSpec, WavFormat};
//!
//! let (samples, spec) = read_wav("input.wav")?;
//! // ... resample `samples` ...
//! let mut quantizer = Quantizer::new(spec.channels as usize, 16, true, false);
//! let ints = quantizer.quantize(&samples);
//! write_wav_pcm("output.wav", &ints, WavSpec {
//!     bits_per_sample: 16,
//!     format: WavFormat::Pcm,
//!     ..spec
//! })?;
//! ```

mod condition;
mod wav;

pub use condition::{Quantizer, db_to_linear};
pub use wav::{
    WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav_float, write_wav_pcm,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
