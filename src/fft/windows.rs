//! Window coefficient tables: closed-form per-sample coefficients, no
//! recursive or FFT-based generation. Coefficients are generated once by
//! the caller and passed to [`crate::fft::FftEngine::apply_window`].

use super::float::Float;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Which window family to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    Rectangular,
    Triangular,
    Hanning,
    Hamming,
    Blackman,
    Vorbis,
}

/// `{ kind, width }` configuration for a window coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub kind: WindowKind,
    pub width: usize,
}

/// Build a length-`width` window coefficient table for `kind`.
///
/// `width == 1` is a degenerate case not covered by the closed forms below
/// (they divide by `width - 1`); it is defined to be the single coefficient
/// `1`, matching every family's value at its midpoint.
pub fn window_coefficients<T: Float>(kind: WindowKind, width: usize) -> Vec<T> {
    if width == 0 {
        return Vec::new();
    }
    if width == 1 {
        return vec![T::ONE];
    }

    let w = width as f64;
    let w_minus_1 = w - 1.0;
    (0..width)
        .map(|n| {
            let n = n as f64;
            let c = match kind {
                WindowKind::Rectangular => 1.0,
                WindowKind::Triangular => 1.0 - (2.0 * n / w_minus_1 - 1.0).abs(),
                WindowKind::Hanning => 0.5 * (1.0 - (2.0 * PI * n / w_minus_1).cos()),
                WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * n / w_minus_1).cos(),
                WindowKind::Blackman => {
                    0.42 - 0.5 * (2.0 * PI * n / w_minus_1).cos() + 0.08 * (4.0 * PI * n / w_minus_1).cos()
                }
                WindowKind::Vorbis => {
                    let s = (PI * (n + 0.5) / w).sin();
                    (0.5 * PI * s * s).sin()
                }
            };
            T::from_f64(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!((a - b).abs() <= tol, "{a} vs {b}");
    }

    #[test]
    fn rectangular_is_all_ones() {
        let w: Vec<f32> = window_coefficients(WindowKind::Rectangular, 8);
        assert_eq!(w, vec![1.0; 8]);
    }

    #[test]
    fn triangular_peaks_at_center_and_falls_to_zero_at_ends() {
        let w: Vec<f32> = window_coefficients(WindowKind::Triangular, 9);
        assert_close(w[0], 0.0, 1e-6);
        assert_close(w[8], 0.0, 1e-6);
        assert_close(w[4], 1.0, 1e-6);
    }

    #[test]
    fn hanning_is_zero_at_endpoints() {
        let w: Vec<f32> = window_coefficients(WindowKind::Hanning, 16);
        assert_close(w[0], 0.0, 1e-6);
        assert_close(w[15], 0.0, 1e-6);
    }

    #[test]
    fn hamming_does_not_reach_zero_at_endpoints() {
        let w: Vec<f32> = window_coefficients(WindowKind::Hamming, 16);
        assert_close(w[0], 0.08, 1e-6);
        assert_close(w[15], 0.08, 1e-6);
    }

    #[test]
    fn blackman_is_near_zero_at_endpoints() {
        let w: Vec<f32> = window_coefficients(WindowKind::Blackman, 16);
        assert!(w[0].abs() < 1e-3);
        assert!(w[15].abs() < 1e-3);
    }

    #[test]
    fn vorbis_satisfies_power_complementarity() {
        // Vorbis windows are designed so adjacent half-overlapped windows
        // sum their squared values to 1; check the self-symmetric special
        // case w[n]^2 + w[n + W/2]^2 == 1 at the overlap midpoint.
        let w: Vec<f32> = window_coefficients(WindowKind::Vorbis, 8);
        assert_close(w[0] * w[0] + w[4] * w[4], 1.0, 1e-5);
    }

    #[test]
    fn degenerate_single_sample_width_is_one() {
        let w: Vec<f32> = window_coefficients(WindowKind::Hanning, 1);
        assert_eq!(w, vec![1.0]);
    }
}
