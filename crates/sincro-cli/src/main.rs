//! Sincro CLI - windowed-sinc polyphase WAV resampler.

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use sincro_core::{DEFAULT_BLOCK_FRAMES, Pipeline, PipelineParams, WindowFunction};
use sincro_io::{
    Quantizer, WavFormat, WavSpec, db_to_linear, read_wav, write_wav_float, write_wav_pcm,
};
use std::path::PathBuf;

/// Tap/filter counts for the quality presets 1 through 4.
const PRESET_SIZES: [usize; 4] = [16, 64, 256, 1024];

#[derive(Parser)]
#[command(name = "sincro")]
#[command(author, version, about = "Windowed-sinc polyphase WAV resampler", long_about = None)]
struct Cli {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Target sample rate in Hz (default: same as the input)
    #[arg(short, long)]
    rate: Option<u32>,

    /// Quality preset: 1..4 select 16/64/256/1024 taps and filters
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=4))]
    quality: u8,

    /// Explicit tap count per filter (multiple of 4, 4..1024)
    #[arg(long)]
    taps: Option<usize>,

    /// Explicit fractional-phase filter count (2..1024)
    #[arg(long)]
    filters: Option<usize>,

    /// Output gain in dB
    #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
    gain: f64,

    /// Phase shift in degrees (magnitude below 360)
    #[arg(short = 's', long, default_value_t = 0.0)]
    phase: f64,

    /// Lowpass cutoff in Hz
    #[arg(short, long)]
    lowpass: Option<f64>,

    /// Disable subsample interpolation between adjacent filters
    #[arg(short = 'n', long)]
    no_interpolate: bool,

    /// Sinc window function
    #[arg(short, long, value_enum, default_value = "hann")]
    window: Window,

    /// Cascade a biquad lowpass before (downsampling) or after (upsampling)
    /// the resampler
    #[arg(short, long)]
    pre_post_filter: bool,

    /// Output bit depth: 4..24 for PCM, 32 for float (default: input depth)
    #[arg(short = 'o', long)]
    bits: Option<u16>,

    /// Disable TPDF dither on PCM output
    #[arg(long)]
    no_dither: bool,

    /// Enable first-order noise shaping on PCM output
    #[arg(long)]
    shape: bool,

    /// Streaming block size in frames
    #[arg(long, default_value_t = DEFAULT_BLOCK_FRAMES)]
    block_size: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Window {
    /// Hann window: narrow transition, moderate stopband
    Hann,
    /// 4-term Blackman-Harris: wide transition, deep stopband
    BlackmanHarris,
}

impl From<Window> for WindowFunction {
    fn from(w: Window) -> Self {
        match w {
            Window::Hann => WindowFunction::Hann,
            Window::BlackmanHarris => WindowFunction::BlackmanHarris4,
        }
    }
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.phase.abs() >= 360.0 {
        bail!("phase shift must be below 360 degrees, got {}", cli.phase);
    }

    let (samples, in_spec) = read_wav(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let channels = in_spec.channels as usize;
    let in_rate = in_spec.sample_rate;
    let out_rate = cli.rate.unwrap_or(in_rate);
    if out_rate == 0 {
        bail!("target sample rate must be nonzero");
    }
    let ratio = f64::from(out_rate) / f64::from(in_rate);
    let in_frames = samples.len() / channels;

    println!(
        "{}: {} frames, {} Hz, {} channel(s), {} bit {}",
        cli.input.display(),
        in_frames,
        in_rate,
        channels,
        in_spec.bits_per_sample,
        match in_spec.format {
            WavFormat::Pcm => "PCM",
            WavFormat::IeeeFloat => "float",
        },
    );

    let bits = cli.bits.unwrap_or(in_spec.bits_per_sample);
    if !(4..=24).contains(&bits) && bits != 32 {
        bail!("output bit depth must be 4..24 or 32, got {bits}");
    }

    // Lowpass in Hz, normalised to the lower of the two Nyquist rates.
    let lowpass = match cli.lowpass {
        None => None,
        Some(hz) => {
            let nyquist = f64::from(in_rate.min(out_rate)) / 2.0;
            if !(hz > 0.0 && hz <= nyquist) {
                bail!("lowpass must be in (0, {nyquist}] Hz, got {hz}");
            }
            Some(hz / nyquist)
        }
    };

    let size = PRESET_SIZES[usize::from(cli.quality - 1)];
    let params = PipelineParams {
        channels,
        num_taps: cli.taps.unwrap_or(size),
        num_filters: cli.filters.unwrap_or(size),
        window: cli.window.into(),
        subsample_interpolate: !cli.no_interpolate,
        ratio,
        lowpass,
        biquad_filter: cli.pre_post_filter,
        phase_shift: cli.phase / 360.0,
        gain: f64::from(db_to_linear(cli.gain as f32)),
        block_frames: cli.block_size,
    };
    let mut pipeline = Pipeline::new(params).context("invalid resampler configuration")?;

    tracing::debug!(in_rate, out_rate, ratio, bits, "starting conversion");
    println!(
        "Resampling to {} Hz (ratio {:.6}), {} taps x {} filters...",
        out_rate, ratio, params.num_taps, params.num_filters
    );

    let pb = ProgressBar::new(in_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut output = Vec::with_capacity((in_frames as f64 * ratio) as usize * channels + channels);
    for chunk in samples.chunks(cli.block_size * channels) {
        pipeline.process(chunk, &mut output)?;
        pb.inc((chunk.len() / channels) as u64);
    }
    pipeline.drain(&mut output)?;
    pb.finish_with_message("done");

    let out_frames = output.len() / channels;
    if bits == 32 {
        let spec = WavSpec {
            channels: in_spec.channels,
            sample_rate: out_rate,
            bits_per_sample: 32,
            format: WavFormat::IeeeFloat,
        };
        write_wav_float(&cli.output, &output, spec)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    } else {
        let mut quantizer = Quantizer::new(channels, bits, !cli.no_dither, cli.shape);
        let ints = quantizer.quantize(&output);
        let spec = WavSpec {
            channels: in_spec.channels,
            sample_rate: out_rate,
            bits_per_sample: quantizer.container_bits(),
            format: WavFormat::Pcm,
        };
        write_wav_pcm(&cli.output, &ints, spec)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    }

    println!(
        "{}: {} frames, {} Hz, {} bit",
        cli.output.display(),
        out_frames,
        out_rate,
        bits
    );
    Ok(())
}
