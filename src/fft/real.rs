//! Real-signal FFT specialization: an `N`-point real DFT computed via an
//! `N/2`-point complex FFT plus a pre/post-twiddle reconstruction that
//! exploits conjugate symmetry.
//!
//! Holds an inner `N/2`-point [`FftEngine`] and the `cos`/`sin` post-twiddle
//! table built in `tables::RealTwiddleTable`. The packed-sequence convention
//! (even samples in the real lane, odd in the imag lane) and the DC/Nyquist
//! packing into bin 0 follow the classic real-FFT packed layout.

use super::complex::cmul;
use super::engine::FftEngine;
use super::float::Float;
use super::tables::RealTwiddleTable;
use std::sync::Arc;

/// `N = 2^M`-point real FFT, implemented as an `N/2`-point complex FFT plus
/// reconstruction. `M >= 2` so that the packed half-spectrum has at least
/// a DC/Nyquist bin and one "middle" bin.
pub struct RealFftEngine<T: Float> {
    order: u32,
    n: usize,
    half_engine: FftEngine<T>,
    post_twiddles: Arc<RealTwiddleTable<T>>,
}

impl<T: Float> RealFftEngine<T> {
    pub fn new(order: u32) -> Self {
        debug_assert!(order >= 2, "real FFT requires order >= 2, got {order}");
        Self {
            order,
            n: 1usize << order,
            half_engine: FftEngine::new(order - 1),
            post_twiddles: Arc::new(RealTwiddleTable::new(order)),
        }
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn half_n(&self) -> usize {
        self.n / 2
    }

    fn quarter_n(&self) -> usize {
        self.n / 4
    }

    /// `forward_real`: packed `N`-sample real input -> `N/2`-bin packed
    /// half-spectrum (`out_re[0]`/`out_im[0]` hold DC/Nyquist).
    pub fn forward_real(&self, input: &[T], out_re: &mut [T], out_im: &mut [T]) {
        debug_assert_eq!(input.len(), self.n);
        debug_assert_eq!(out_re.len(), self.half_n());
        debug_assert_eq!(out_im.len(), self.half_n());

        self.half_engine.forward_interleaved(input, out_re, out_im);
        self.reconstruct(out_re, out_im);
    }

    /// `inverse_real`: packed half-spectrum -> `N` interleaved real time
    /// samples. Does not modify `in_re`/`in_im`; the caller supplies the
    /// `N/2`-long scratch pair the pre-twiddle/permute/inverse steps need to
    /// work in, so this stays a `&self` method like every other transform on
    /// this type — an `FftEngine`/`RealFftEngine` is immutable after
    /// construction and shareable across threads without synchronization,
    /// and caching scratch buffers as instance fields would have broken that.
    pub fn inverse_real(&self, in_re: &[T], in_im: &[T], scratch_re: &mut [T], scratch_im: &mut [T], output: &mut [T]) {
        debug_assert_eq!(in_re.len(), self.half_n());
        debug_assert_eq!(in_im.len(), self.half_n());
        debug_assert_eq!(scratch_re.len(), self.half_n());
        debug_assert_eq!(scratch_im.len(), self.half_n());
        debug_assert_eq!(output.len(), self.n);

        scratch_re.copy_from_slice(in_re);
        scratch_im.copy_from_slice(in_im);
        Self::predeconstruct_into(&self.post_twiddles, self.half_n(), self.quarter_n(), scratch_re, scratch_im);
        self.half_engine.permute_in_place(scratch_re, scratch_im);
        self.half_engine.inverse_in_place_dit(scratch_re, scratch_im);
        interleave(scratch_re, scratch_im, output);
    }

    /// `inverse_real_clobber_input`: same as `inverse_real` but overwrites
    /// `in_re`/`in_im` in place instead of using a scratch buffer.
    pub fn inverse_real_clobber_input(&self, in_re: &mut [T], in_im: &mut [T], output: &mut [T]) {
        debug_assert_eq!(in_re.len(), self.half_n());
        debug_assert_eq!(in_im.len(), self.half_n());
        debug_assert_eq!(output.len(), self.n);

        Self::predeconstruct_into(&self.post_twiddles, self.half_n(), self.quarter_n(), in_re, in_im);
        self.half_engine.permute_in_place(in_re, in_im);

        self.half_engine.inverse_in_place_dit(in_re, in_im);
        interleave(in_re, in_im, output);
    }

    /// Z -> X reconstruction, done in place on the half-spectrum buffers.
    fn reconstruct(&self, zr: &mut [T], zi: &mut [T]) {
        let half_n = self.half_n();
        let quarter_n = self.quarter_n();
        let half = T::from_f64(0.5);

        let z0_re = zr[0];
        let z0_im = zi[0];
        zr[0] = z0_re + z0_im;
        zi[0] = z0_re - z0_im;

        for k in 1..quarter_n {
            let kp = half_n - k;
            let (cos_k, sin_k) = self.post_twiddles.get(k);
            let (zk_re, zk_im) = (zr[k], zi[k]);
            let (zkp_re, zkp_im) = (zr[kp], zi[kp]);

            let (xk_re, xk_im) = reconstruct_bin(zk_re, zk_im, zkp_re, zkp_im, cos_k, sin_k, half);
            let (xkp_re, xkp_im) = reconstruct_bin(zkp_re, zkp_im, zk_re, zk_im, -cos_k, sin_k, half);

            zr[k] = xk_re;
            zi[k] = xk_im;
            zr[kp] = xkp_re;
            zi[kp] = xkp_im;
        }

        let mid = quarter_n;
        let (zm_re, zm_im) = (zr[mid], zi[mid]);
        let (xm_re, xm_im) = reconstruct_bin(zm_re, zm_im, zm_re, zm_im, T::ZERO, T::ONE, half);
        zr[mid] = xm_re;
        zi[mid] = xm_im;
    }

    /// X -> Z pre-twiddle (the adjoint of `reconstruct`), done in place.
    fn predeconstruct_into(
        post_twiddles: &RealTwiddleTable<T>,
        half_n: usize,
        quarter_n: usize,
        xr: &mut [T],
        xi: &mut [T],
    ) {
        let half = T::from_f64(0.5);

        let x0_re = xr[0];
        let x0_im = xi[0];
        xr[0] = half * (x0_re + x0_im);
        xi[0] = half * (x0_re - x0_im);

        for k in 1..quarter_n {
            let kp = half_n - k;
            let (cos_k, sin_k) = post_twiddles.get(k);
            let (xk_re, xk_im) = (xr[k], xi[k]);
            let (xkp_re, xkp_im) = (xr[kp], xi[kp]);

            let (zk_re, zk_im, zkp_re, zkp_im) =
                predeconstruct_bin(xk_re, xk_im, xkp_re, xkp_im, cos_k, sin_k, half);

            xr[k] = zk_re;
            xi[k] = zk_im;
            xr[kp] = zkp_re;
            xi[kp] = zkp_im;
        }

        let mid = quarter_n;
        let (xm_re, xm_im) = (xr[mid], xi[mid]);
        let (zm_re, zm_im, _, _) = predeconstruct_bin(xm_re, xm_im, xm_re, xm_im, T::ZERO, T::ONE, half);
        xr[mid] = zm_re;
        xi[mid] = zm_im;
    }

}

#[inline]
fn reconstruct_bin<T: Float>(
    zk_re: T,
    zk_im: T,
    zkp_re: T,
    zkp_im: T,
    cos: T,
    sin: T,
    half: T,
) -> (T, T) {
    let a_re = half * (zk_re + zkp_re);
    let a_im = half * (zk_im - zkp_im);
    let d_re = half * (zk_re - zkp_re);
    let d_im = half * (zk_im + zkp_im);
    let (b_re, b_im) = cmul(d_re, d_im, cos, -sin);
    (a_re + b_im, a_im - b_re)
}

#[inline]
fn predeconstruct_bin<T: Float>(
    xk_re: T,
    xk_im: T,
    xkp_re: T,
    xkp_im: T,
    cos: T,
    sin: T,
    half: T,
) -> (T, T, T, T) {
    let a_re = half * (xk_re + xkp_re);
    let a_im = half * (xk_im - xkp_im);
    let diff_re = xk_re - xkp_re;
    let diff_im = xk_im + xkp_im;
    let b_re = -(half * diff_im);
    let b_im = half * diff_re;
    let (d_re, d_im) = cmul(b_re, b_im, cos, sin);
    let zk_re = a_re + d_re;
    let zk_im = a_im + d_im;
    let zkp_re = a_re - d_re;
    let zkp_im = -(a_im - d_im);
    (zk_re, zk_im, zkp_re, zkp_im)
}

fn interleave<T: Float>(re: &[T], im: &[T], out: &mut [T]) {
    debug_assert_eq!(re.len(), im.len());
    debug_assert_eq!(out.len(), re.len() * 2);
    for i in 0..re.len() {
        out[2 * i] = re[i];
        out[2 * i + 1] = im[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!((a - b).abs() <= tol, "{a} vs {b}");
    }

    #[test]
    fn real_fft_sine_scenario_s3() {
        let engine = RealFftEngine::<f32>::new(6);
        let n = engine.len();
        let x: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 6.0 * i as f32 / n as f32).cos())
            .collect();
        let mut out_re = vec![0.0f32; n / 2];
        let mut out_im = vec![0.0f32; n / 2];
        engine.forward_real(&x, &mut out_re, &mut out_im);

        let magnitude_6 = (out_re[6] * out_re[6] + out_im[6] * out_im[6]).sqrt();
        assert!(
            magnitude_6 > 20.0,
            "expected a strong bin at k=6, got magnitude {magnitude_6}"
        );
        for k in 0..n / 2 {
            if k != 6 {
                let mag = (out_re[k] * out_re[k] + out_im[k] * out_im[k]).sqrt();
                assert!(mag < 5.0, "unexpected energy at bin {k}: {mag}");
            }
        }
    }

    #[test]
    fn real_fft_matches_complexified_forward_property_2() {
        let order = 5;
        let real_engine = RealFftEngine::<f32>::new(order);
        let complex_engine = FftEngine::<f32>::new(order);
        let n = real_engine.len();

        let x: Vec<f32> = (0..n).map(|i| ((i * 11 + 3) % 17) as f32 - 8.0).collect();
        let mut out_re = vec![0.0f32; n / 2];
        let mut out_im = vec![0.0f32; n / 2];
        real_engine.forward_real(&x, &mut out_re, &mut out_im);

        let in_im = vec![0.0f32; n];
        let mut full_re = vec![0.0f32; n];
        let mut full_im = vec![0.0f32; n];
        complex_engine.forward(&x, &in_im, &mut full_re, &mut full_im);

        for k in 0..n / 2 {
            if k == 0 {
                assert_close(out_re[0], full_re[0], 1e-2);
                assert_close(out_im[0], full_re[n / 2], 1e-2);
            } else {
                assert_close(out_re[k], full_re[k], 2e-2);
                assert_close(out_im[k], full_im[k], 2e-2);
            }
        }
    }

    #[test]
    fn forward_then_inverse_round_trips_scaled_by_n() {
        let engine = RealFftEngine::<f32>::new(6);
        let n = engine.len();
        let x: Vec<f32> = (0..n).map(|i| ((i * 5 + 2) % 9) as f32 - 4.0).collect();

        let mut spec_re = vec![0.0f32; n / 2];
        let mut spec_im = vec![0.0f32; n / 2];
        engine.forward_real(&x, &mut spec_re, &mut spec_im);

        let mut scratch_re = vec![0.0f32; n / 2];
        let mut scratch_im = vec![0.0f32; n / 2];
        let mut round_tripped = vec![0.0f32; n];
        engine.inverse_real(&spec_re, &spec_im, &mut scratch_re, &mut scratch_im, &mut round_tripped);

        for i in 0..n {
            assert_close(round_tripped[i], x[i] * n as f32, 5e-2);
        }
    }

    #[test]
    fn clobbering_inverse_matches_scratch_inverse() {
        let engine = RealFftEngine::<f32>::new(5);
        let n = engine.len();
        let x: Vec<f32> = (0..n).map(|i| (i as f32 * 0.23).sin()).collect();

        let mut spec_re = vec![0.0f32; n / 2];
        let mut spec_im = vec![0.0f32; n / 2];
        engine.forward_real(&x, &mut spec_re, &mut spec_im);

        let mut scratch_re = vec![0.0f32; n / 2];
        let mut scratch_im = vec![0.0f32; n / 2];
        let mut via_scratch = vec![0.0f32; n];
        engine.inverse_real(&spec_re, &spec_im, &mut scratch_re, &mut scratch_im, &mut via_scratch);

        let mut clobber_re = spec_re.clone();
        let mut clobber_im = spec_im.clone();
        let mut via_clobber = vec![0.0f32; n];
        engine.inverse_real_clobber_input(&mut clobber_re, &mut clobber_im, &mut via_clobber);

        for i in 0..n {
            assert_close(via_scratch[i], via_clobber[i], 1e-4);
        }
    }
}
