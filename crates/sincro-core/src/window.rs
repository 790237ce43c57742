//! Window functions for FIR filter design.
//!
//! Both windows are evaluated on a normalised span: the argument `u` runs
//! over `[-1, 1]` with the window at 1.0 in the centre and 0.0 at the edges.
//! Evaluation is in `f64` because these feed filter design, not the audio
//! path.

use libm::cos;

use core::f64::consts::PI;

/// Window applied to the sinc impulse response of a filter bank.
///
/// The choice trades main-lobe width (transition sharpness) against side-lobe
/// level (stopband depth): Hann reaches roughly -44 dB side lobes with a
/// narrow main lobe, the 4-term Blackman-Harris roughly -92 dB with a main
/// lobe twice as wide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowFunction {
    /// Raised cosine: `0.5 + 0.5*cos(pi*u)`.
    #[default]
    Hann,
    /// 4-term Blackman-Harris with the standard coefficients
    /// (a0 = 0.35875, a1 = 0.48829, a2 = 0.14128, a3 = 0.01168).
    BlackmanHarris4,
}

impl WindowFunction {
    /// Evaluate the window at `u` in `[-1, 1]`.
    ///
    /// Returns 0.0 outside that span, so callers can evaluate the raw sinc
    /// grid without edge checks.
    pub fn evaluate(self, u: f64) -> f64 {
        if !(-1.0..=1.0).contains(&u) {
            return 0.0;
        }
        match self {
            WindowFunction::Hann => 0.5 + 0.5 * cos(PI * u),
            WindowFunction::BlackmanHarris4 => {
                0.35875 + 0.48829 * cos(PI * u) + 0.14128 * cos(2.0 * PI * u)
                    + 0.01168 * cos(3.0 * PI * u)
            }
        }
    }
}
