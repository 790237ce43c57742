//! WAV file reading and writing.
//!
//! Unlike a playback loader, nothing here mixes or reshapes channels: the
//! resampler works on interleaved frames, so files pass through with their
//! channel count intact.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Container bit depth per sample (8, 16, 24, or 32).
    pub bits_per_sample: u16,
    /// Audio encoding format.
    pub format: WavFormat,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            format: WavFormat::IeeeFloat,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            format: match spec.sample_format {
                SampleFormat::Float => WavFormat::IeeeFloat,
                SampleFormat::Int => WavFormat::Pcm,
            },
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: match spec.format {
                WavFormat::IeeeFloat => SampleFormat::Float,
                WavFormat::Pcm => SampleFormat::Int,
            },
        }
    }
}

/// Read WAV metadata without loading sample data.
///
/// Much faster than [`read_wav`] when only the header matters.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = reader.len() as u64; // total across all channels
    let num_frames = total_samples / spec.channels as u64;
    let duration_secs = num_frames as f64 / spec.sample_rate as f64;

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Read a WAV file into interleaved f32 samples plus the spec.
///
/// Integer samples are normalised to `[-1.0, 1.0)` by the full scale of
/// their bit depth; float samples pass through untouched.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    if spec.bits_per_sample > 32 {
        return Err(Error::UnsupportedFormat(format!(
            "{} bits per sample",
            spec.bits_per_sample
        )));
    }

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    tracing::debug!(
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        samples = samples.len(),
        "read WAV"
    );
    Ok((samples, spec))
}

/// Write interleaved float samples to a 32-bit IEEE float WAV file.
pub fn write_wav_float<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    debug_assert_eq!(spec.format, WavFormat::IeeeFloat);
    let mut writer = WavWriter::create(path, spec.into())?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Write interleaved integer samples to a PCM WAV file.
///
/// The samples must already sit at the container scale of
/// `spec.bits_per_sample`; conditioning from float belongs to
/// [`Quantizer`](crate::Quantizer).
pub fn write_wav_pcm<P: AsRef<Path>>(path: P, samples: &[i32], spec: WavSpec) -> Result<()> {
    debug_assert_eq!(spec.format, WavFormat::Pcm);
    let mut writer = WavWriter::create(path, spec.into())?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
