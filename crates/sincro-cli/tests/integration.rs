//! Integration tests for the sincro binary: end-to-end WAV conversions and
//! argument validation through real process invocations.

use sincro_io::{WavFormat, WavSpec, read_wav, read_wav_info, write_wav_float};
use std::path::Path;
use std::process::Command;

/// Helper to get the path to the `sincro` binary built by cargo.
fn sincro_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sincro"))
}

/// Write a stereo test sine to `path` at `sample_rate`.
fn write_test_input(path: &Path, frames: usize, sample_rate: u32) {
    let mut samples = Vec::with_capacity(frames * 2);
    for n in 0..frames {
        let t = n as f32 * 0.00731;
        samples.push(t.sin() * 0.7);
        samples.push((t * 1.7).cos() * 0.4);
    }
    write_wav_float(
        path,
        &samples,
        WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 32,
            format: WavFormat::IeeeFloat,
        },
    )
    .unwrap();
}

#[test]
fn cli_shows_help() {
    let output = sincro_bin().arg("--help").output().expect("failed to run sincro");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--rate"));
    assert!(stdout.contains("--bits"));
}

#[test]
fn cli_requires_input_and_output() {
    let output = sincro_bin().output().expect("failed to run sincro");
    assert!(!output.status.success());
}

#[test]
fn cli_converts_cd_rate_to_dat_rate() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_test_input(&input, 44100, 44100);

    let status = sincro_bin()
        .arg(&input)
        .arg(&out)
        .args(["--rate", "48000", "--quality", "2"])
        .status()
        .expect("failed to run sincro");
    assert!(status.success());

    let info = read_wav_info(&out).unwrap();
    assert_eq!(info.sample_rate, 48000);
    assert_eq!(info.channels, 2);
    assert_eq!(info.num_frames, 48000);
    assert_eq!(info.format, WavFormat::IeeeFloat);
}

#[test]
fn cli_same_rate_float_conversion_is_transparent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_test_input(&input, 8000, 48000);

    let status = sincro_bin()
        .arg(&input)
        .arg(&out)
        .status()
        .expect("failed to run sincro");
    assert!(status.success());

    let (original, _) = read_wav(&input).unwrap();
    let (converted, _) = read_wav(&out).unwrap();
    assert_eq!(converted.len(), original.len());
    // Skip the group-delay ramps at both ends (256 taps at quality 3).
    for n in 600..(original.len() - 600) {
        assert!(
            (original[n] - converted[n]).abs() < 1e-3,
            "sample {n}: {} vs {}",
            original[n],
            converted[n]
        );
    }
}

#[test]
fn cli_writes_pcm16_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_test_input(&input, 4000, 48000);

    let status = sincro_bin()
        .arg(&input)
        .arg(&out)
        .args(["--rate", "24000", "--bits", "16"])
        .status()
        .expect("failed to run sincro");
    assert!(status.success());

    let info = read_wav_info(&out).unwrap();
    assert_eq!(info.format, WavFormat::Pcm);
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.num_frames, 2000);
}

#[test]
fn cli_sub_byte_depth_uses_byte_container() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_test_input(&input, 2000, 44100);

    let status = sincro_bin()
        .arg(&input)
        .arg(&out)
        .args(["--bits", "12", "--shape"])
        .status()
        .expect("failed to run sincro");
    assert!(status.success());

    let info = read_wav_info(&out).unwrap();
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.format, WavFormat::Pcm);
}

#[test]
fn cli_rejects_invalid_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_test_input(&input, 1000, 44100);

    let cases: &[&[&str]] = &[
        &["--phase", "400"],
        &["--bits", "3"],
        &["--bits", "25"],
        &["--quality", "9"],
        &["--taps", "30"],
        &["--lowpass", "0"],
    ];
    for args in cases {
        let status = sincro_bin()
            .arg(&input)
            .arg(&out)
            .args(*args)
            .status()
            .expect("failed to run sincro");
        assert!(!status.success(), "expected failure for {args:?}");
    }
}

#[test]
fn cli_gain_scales_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_test_input(&input, 4000, 48000);

    let status = sincro_bin()
        .arg(&input)
        .arg(&out)
        .args(["--gain", "-6.0206"])
        .status()
        .expect("failed to run sincro");
    assert!(status.success());

    let (original, _) = read_wav(&input).unwrap();
    let (converted, _) = read_wav(&out).unwrap();
    for n in 600..(original.len() - 600) {
        assert!((original[n] * 0.5 - converted[n]).abs() < 1e-3);
    }
}
