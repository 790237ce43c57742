//! Polyphase windowed-sinc filter bank.
//!
//! A bank is an `F x T` table of FIR filters sampled from one continuous
//! windowed-sinc impulse response `h(x) = w(x / (T/2)) * sinc(c * x)`, where
//! `w` is the chosen window, `c` the normalised lowpass cutoff (1.0 when no
//! lowpass is embedded), and `sinc(y) = sin(pi*y) / (pi*y)`. Row `k` holds
//! `h` sampled at the fractional phase offset `k/F` of one input sample, so
//! an arbitrary read position is resolved by picking the nearest row (or
//! blending the two neighbouring rows, see
//! [`subsample_interpolate`](BankParams::subsample_interpolate)).
//!
//! The table carries one extra *sentinel* row at index `F`: row 0 shifted by
//! a whole tap. Blending rows `k` and `k + 1` therefore needs no wrap logic
//! at `k = F - 1`.
//!
//! Every row is normalised to unity DC gain, so a constant input comes out
//! at the same level regardless of phase.
//!
//! Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*,
//! Prentice Hall, 1993, Chapter 4.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use libm::{fabs, sin};

use crate::error::{ResampleError, Result};
use crate::window::WindowFunction;

use core::f64::consts::PI;

/// Construction-time parameters for a [`FilterBank`].
#[derive(Clone, Copy, Debug)]
pub struct BankParams {
    /// Number of fractional phases `F`, in `2..=1024`.
    pub num_filters: usize,
    /// Taps per filter `T`: a multiple of 4 in `4..=1024`.
    pub num_taps: usize,
    /// Normalised lowpass cutoff in `(0, 1]`, as a fraction of the input
    /// Nyquist frequency. Only applied when `include_lowpass` is set.
    pub cutoff: f64,
    /// Window applied to the sinc.
    pub window: WindowFunction,
    /// Scale the sinc by `cutoff`, embedding an anti-alias lowpass into the
    /// bank itself.
    pub include_lowpass: bool,
    /// Whether the driver linearly blends adjacent rows for phases finer
    /// than `1/F`.
    pub subsample_interpolate: bool,
}

impl Default for BankParams {
    fn default() -> Self {
        Self {
            num_filters: 256,
            num_taps: 256,
            cutoff: 1.0,
            window: WindowFunction::default(),
            subsample_interpolate: true,
            include_lowpass: false,
        }
    }
}

/// Precomputed polyphase tap table. Immutable after construction, so it can
/// be shared between any number of resampler instances.
#[derive(Clone, Debug)]
pub struct FilterBank {
    num_filters: usize,
    num_taps: usize,
    window: WindowFunction,
    cutoff: f64,
    include_lowpass: bool,
    subsample_interpolate: bool,
    /// `(num_filters + 1) * num_taps` coefficients, row-major, sentinel last.
    taps: Vec<f32>,
}

/// `sin(pi*y) / (pi*y)`, continued with 1.0 at the origin.
fn sinc(y: f64) -> f64 {
    if fabs(y) < 1e-9 {
        1.0
    } else {
        sin(PI * y) / (PI * y)
    }
}

impl FilterBank {
    /// Build the tap table from `params`.
    ///
    /// Design runs in `f64`; the stored table is `f32` to match the audio
    /// path. Each row is normalised to unity DC gain after windowing.
    pub fn new(params: BankParams) -> Result<Self> {
        let f = params.num_filters;
        let t = params.num_taps;
        if !(2..=1024).contains(&f) {
            return Err(ResampleError::InvalidFilterCount(f));
        }
        if !(4..=1024).contains(&t) || t % 4 != 0 {
            return Err(ResampleError::InvalidTapCount(t));
        }
        if !(params.cutoff > 0.0 && params.cutoff <= 1.0) {
            return Err(ResampleError::InvalidCutoff(params.cutoff));
        }

        let cutoff = if params.include_lowpass {
            params.cutoff
        } else {
            1.0
        };
        let half = t as f64 / 2.0;
        let mut taps = vec![0.0f32; (f + 1) * t];
        let mut row = vec![0.0f64; t];

        for k in 0..f {
            let frac = k as f64 / f as f64;
            let mut sum = 0.0f64;
            for (i, v) in row.iter_mut().enumerate() {
                // Distance from the filter centre at tap T/2 - 1 + k/F.
                let x = i as f64 - (half - 1.0) - frac;
                *v = params.window.evaluate(x / half) * sinc(cutoff * x);
                sum += *v;
            }
            let dest = &mut taps[k * t..(k + 1) * t];
            for (d, v) in dest.iter_mut().zip(row.iter()) {
                *d = (v / sum) as f32;
            }
        }

        // Sentinel row: filter 0 delayed by one whole tap, so blending rows
        // k and k + 1 stays in-bounds at k = F - 1.
        taps[f * t] = 0.0;
        for i in 1..t {
            taps[f * t + i] = taps[i - 1];
        }

        Ok(Self {
            num_filters: f,
            num_taps: t,
            window: params.window,
            cutoff: params.cutoff,
            include_lowpass: params.include_lowpass,
            subsample_interpolate: params.subsample_interpolate,
            taps,
        })
    }

    /// Number of fractional phases `F`.
    pub fn num_filters(&self) -> usize {
        self.num_filters
    }

    /// Taps per filter `T`.
    pub fn num_taps(&self) -> usize {
        self.num_taps
    }

    /// The window the bank was designed with.
    pub fn window(&self) -> WindowFunction {
        self.window
    }

    /// The cutoff the bank was designed with (stored even when unused).
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Whether the sinc was scaled by the cutoff.
    pub fn include_lowpass(&self) -> bool {
        self.include_lowpass
    }

    /// Whether drivers should blend adjacent rows.
    pub fn subsample_interpolate(&self) -> bool {
        self.subsample_interpolate
    }

    /// Tap row for phase index `k`, valid for `k` in `0..=F` (the last row
    /// is the sentinel).
    #[inline]
    pub fn filter(&self, k: usize) -> &[f32] {
        debug_assert!(k <= self.num_filters);
        &self.taps[k * self.num_taps..(k + 1) * self.num_taps]
    }
}

/// Widening factor for the embedded-lowpass cutoff of a downsampling bank.
///
/// Longer filters have sharper transitions, so their cutoff can sit closer
/// to the target Nyquist: `max(1 - 10.24/T, 0.84, ratio)`.
pub fn lowpass_ratio(num_taps: usize, ratio: f64) -> f64 {
    (1.0 - 10.24 / num_taps as f64).max(0.84).max(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(f: usize, t: usize, window: WindowFunction) -> FilterBank {
        FilterBank::new(BankParams {
            num_filters: f,
            num_taps: t,
            window,
            ..BankParams::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_tap_count() {
        for t in [0, 2, 6, 1026, 2048] {
            let r = FilterBank::new(BankParams {
                num_taps: t,
                ..BankParams::default()
            });
            assert_eq!(r.unwrap_err(), ResampleError::InvalidTapCount(t));
        }
    }

    #[test]
    fn test_rejects_bad_filter_count() {
        for f in [0, 1, 1025] {
            let r = FilterBank::new(BankParams {
                num_filters: f,
                ..BankParams::default()
            });
            assert_eq!(r.unwrap_err(), ResampleError::InvalidFilterCount(f));
        }
    }

    #[test]
    fn test_rejects_bad_cutoff() {
        for c in [0.0, -0.5, 1.5, f64::NAN] {
            let r = FilterBank::new(BankParams {
                cutoff: c,
                ..BankParams::default()
            });
            assert!(matches!(r, Err(ResampleError::InvalidCutoff(_))));
        }
    }

    #[test]
    fn test_rows_sum_to_unity() {
        for window in [WindowFunction::Hann, WindowFunction::BlackmanHarris4] {
            let b = bank(64, 64, window);
            for k in 0..=64 {
                let sum: f32 = b.filter(k).iter().sum();
                assert!(
                    (sum - 1.0).abs() < 1e-5,
                    "{window:?} row {k} sums to {sum}"
                );
            }
        }
    }

    #[test]
    fn test_sentinel_is_shifted_row_zero() {
        let b = bank(32, 64, WindowFunction::BlackmanHarris4);
        let first = b.filter(0);
        let sentinel = b.filter(32);
        assert_eq!(sentinel[0], 0.0);
        for i in 1..64 {
            assert_eq!(sentinel[i], first[i - 1], "sentinel tap {i}");
        }
    }

    #[test]
    fn test_phase_zero_of_smallest_bank_is_unit_pulse() {
        // With cutoff 1.0 the sinc is zero at every nonzero integer, so the
        // zero-phase row reduces to a single unit tap at T/2 - 1.
        let b = bank(2, 4, WindowFunction::Hann);
        let row = b.filter(0);
        assert!((row[1] - 1.0).abs() < 1e-6);
        for i in [0usize, 2, 3] {
            assert!(row[i].abs() < 1e-6, "tap {i} = {}", row[i]);
        }
    }

    #[test]
    fn test_lowpass_widens_main_lobe() {
        let full = bank(16, 64, WindowFunction::Hann);
        let half = FilterBank::new(BankParams {
            num_filters: 16,
            num_taps: 64,
            cutoff: 0.5,
            include_lowpass: true,
            window: WindowFunction::Hann,
            ..BankParams::default()
        })
        .unwrap();
        // A narrower passband spreads energy across more taps; the centre
        // tap must shrink.
        assert!(half.filter(0)[31] < full.filter(0)[31]);
        assert!((half.cutoff() - 0.5).abs() < 1e-12);
        assert!(half.include_lowpass());
    }

    #[test]
    fn test_cutoff_ignored_without_lowpass_flag() {
        let a = bank(8, 32, WindowFunction::Hann);
        let b = FilterBank::new(BankParams {
            num_filters: 8,
            num_taps: 32,
            cutoff: 0.3,
            include_lowpass: false,
            window: WindowFunction::Hann,
            ..BankParams::default()
        })
        .unwrap();
        assert_eq!(a.filter(3), b.filter(3));
    }

    #[test]
    fn test_lowpass_ratio_policy() {
        // Long filter: the 1 - 10.24/T term dominates.
        assert!((lowpass_ratio(1024, 0.5) - (1.0 - 10.24 / 1024.0)).abs() < 1e-12);
        // Short filter: floored at 0.84.
        assert!((lowpass_ratio(16, 0.5) - 0.84).abs() < 1e-12);
        // Mild downsampling: floored at the ratio itself.
        assert!((lowpass_ratio(16, 0.95) - 0.95).abs() < 1e-12);
        // T = 64 lands exactly on the floor.
        assert!((lowpass_ratio(64, 0.5) - 0.84).abs() < 1e-12);
    }
}
