//! Sample conditioning at the float-to-integer edge.
//!
//! The resampler itself never clips or rounds; everything lossy happens
//! here, once, on the way into the output container. A [`Quantizer`] holds
//! the per-channel state that makes that rounding well behaved: an
//! independent PRNG per channel feeding TPDF dither, and a running
//! quantisation-error accumulator per channel for first-order noise
//! shaping.

/// Convert decibels to linear gain (0 dB = 1.0, -6 dB = 0.5).
pub fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Xorshift32 PRNG for dither generation.
#[derive(Debug, Clone)]
struct Xorshift32(u32);

impl Xorshift32 {
    /// Uniform sample in `[0, 1)`.
    #[inline]
    fn uniform(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Streaming float-to-PCM conversion with optional TPDF dither and
/// first-order noise shaping.
///
/// Quantisation happens at the requested bit depth (4 to 24 bits); the
/// result is then shifted up to the next byte-aligned container width, so a
/// 12-bit request produces full-scale 16-bit container samples with four
/// zero low bits.
#[derive(Debug, Clone)]
pub struct Quantizer {
    channels: usize,
    bits: u16,
    dither: bool,
    noise_shaping: bool,
    scale: f32,
    /// Running quantisation error per channel (in LSB units).
    error: Vec<f32>,
    /// Independent dither source per channel.
    rng: Vec<Xorshift32>,
}

impl Quantizer {
    /// Build a quantizer for `channels` interleaved channels at `bits`
    /// depth (4 to 24).
    ///
    /// # Panics
    ///
    /// Panics if `bits` is outside `4..=24` or `channels` is 0.
    pub fn new(channels: usize, bits: u16, dither: bool, noise_shaping: bool) -> Self {
        assert!((4..=24).contains(&bits), "bit depth {bits} out of 4..=24");
        assert!(channels > 0);
        Self {
            channels,
            bits,
            dither,
            noise_shaping,
            scale: (1u32 << (bits - 1)) as f32,
            error: vec![0.0; channels],
            rng: (0..channels)
                .map(|ch| Xorshift32(0x9E3779B9u32.wrapping_mul(ch as u32 + 1)))
                .collect(),
        }
    }

    /// The byte-aligned container width the output samples sit at.
    pub fn container_bits(&self) -> u16 {
        self.bits.div_ceil(8) * 8
    }

    /// Quantize interleaved float samples to container-scale integers.
    ///
    /// Out-of-range input clamps at the integer full scale; the float side
    /// is never touched.
    pub fn quantize(&mut self, input: &[f32]) -> Vec<i32> {
        debug_assert_eq!(input.len() % self.channels, 0);
        let max = (1i32 << (self.bits - 1)) - 1;
        let min = -(1i32 << (self.bits - 1));
        let shift = self.container_bits() - self.bits;

        let mut out = Vec::with_capacity(input.len());
        for (i, &sample) in input.iter().enumerate() {
            let ch = i % self.channels;
            let mut value = sample * self.scale;
            if self.noise_shaping {
                value -= self.error[ch];
            }
            let target = if self.dither {
                let rng = &mut self.rng[ch];
                value + (rng.uniform() - rng.uniform())
            } else {
                value
            };
            let rounded = target.round();
            if self.noise_shaping {
                self.error[ch] = rounded - value;
            }
            let clamped = (rounded as i64).clamp(i64::from(min), i64::from(max)) as i32;
            out.push(clamped << shift);
        }
        out
    }

    /// Zero the error accumulators (the PRNGs keep running).
    pub fn reset(&mut self) {
        self.error.fill(0.0);
    }
}
