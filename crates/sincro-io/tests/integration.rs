//! Integration tests for sincro-io: WAV round-trips through real files and
//! the quantizer-to-container path.

use sincro_io::{
    Quantizer, WavFormat, WavSpec, read_wav, read_wav_info, write_wav_float, write_wav_pcm,
};
use tempfile::tempdir;

fn test_signal(frames: usize, channels: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(frames * channels);
    for n in 0..frames {
        for ch in 0..channels {
            let phase = n as f32 * 0.013 + ch as f32 * 0.5;
            out.push(phase.sin() * 0.8);
        }
    }
    out
}

#[test]
fn float_roundtrip_is_lossless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("float.wav");
    let samples = test_signal(500, 2);
    let spec = WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 32,
        format: WavFormat::IeeeFloat,
    };

    write_wav_float(&path, &samples, spec).unwrap();
    let (back, read_spec) = read_wav(&path).unwrap();

    assert_eq!(read_spec.channels, 2);
    assert_eq!(read_spec.sample_rate, 48000);
    assert_eq!(read_spec.format, WavFormat::IeeeFloat);
    assert_eq!(back, samples);
}

#[test]
fn pcm16_roundtrip_is_within_half_lsb() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pcm16.wav");
    let samples = test_signal(500, 1);

    let mut q = Quantizer::new(1, 16, false, false);
    let ints = q.quantize(&samples);
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        format: WavFormat::Pcm,
    };
    write_wav_pcm(&path, &ints, spec).unwrap();

    let (back, read_spec) = read_wav(&path).unwrap();
    assert_eq!(read_spec.format, WavFormat::Pcm);
    assert_eq!(back.len(), samples.len());
    for (&a, &b) in samples.iter().zip(&back) {
        assert!((a - b).abs() <= 0.5 / 32768.0 + 1e-6, "{a} vs {b}");
    }
}

#[test]
fn pcm24_roundtrip_preserves_resolution() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pcm24.wav");
    let samples = test_signal(200, 2);

    let mut q = Quantizer::new(2, 24, false, false);
    let ints = q.quantize(&samples);
    let spec = WavSpec {
        channels: 2,
        sample_rate: 96000,
        bits_per_sample: 24,
        format: WavFormat::Pcm,
    };
    write_wav_pcm(&path, &ints, spec).unwrap();

    let (back, _) = read_wav(&path).unwrap();
    for (&a, &b) in samples.iter().zip(&back) {
        assert!((a - b).abs() <= 0.5 / 8388608.0 + 1e-6);
    }
}

#[test]
fn info_reports_frames_not_samples() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.wav");
    let samples = test_signal(1234, 2);
    write_wav_float(&path, &samples, WavSpec {
        channels: 2,
        ..WavSpec::default()
    })
    .unwrap();

    let info = read_wav_info(&path).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.num_frames, 1234);
    assert!((info.duration_secs - 1234.0 / 48000.0).abs() < 1e-9);
    assert_eq!(info.format, WavFormat::IeeeFloat);
}

#[test]
fn sub_byte_depth_writes_into_byte_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pcm12.wav");
    let samples = test_signal(300, 1);

    let mut q = Quantizer::new(1, 12, true, true);
    let ints = q.quantize(&samples);
    let spec = WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: q.container_bits(),
        format: WavFormat::Pcm,
    };
    write_wav_pcm(&path, &ints, spec).unwrap();

    let (back, read_spec) = read_wav(&path).unwrap();
    assert_eq!(read_spec.bits_per_sample, 16);
    // 12 significant bits: rounding plus dither spread plus the shaping
    // feedback of the previous sample's error.
    for (&a, &b) in samples.iter().zip(&back) {
        assert!((a - b).abs() <= 3.0 / 2048.0 + 1e-6);
    }
}
