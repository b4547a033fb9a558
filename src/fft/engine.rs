//! The complex radix-2 FFT engine: iterative Cooley-Tukey, mixed DIT/DIF
//! stage loops over the per-stage contiguous twiddle tables in `tables.rs`,
//! with an explicit out-of-place and in-place variant of each direction.

use std::sync::Arc;

use super::complex::cmul;
use super::float::Float;
use super::tables::{BitRevTable, TwiddleTable};

/// A single complex sample, used for the "one interleaved buffer"
/// representation alongside the split real/imag form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// An immutable radix-2 FFT instance for a fixed order `M`.
///
/// Tables are built once at construction and held behind `Arc`, so cloning
/// an engine (to hand a copy to another thread, or to a `Convolver`) is a
/// pointer-refcount bump rather than a table rebuild, and an engine is safe
/// to share across threads without synchronization.
#[derive(Clone)]
pub struct FftEngine<T: Float> {
    order: u32,
    n: usize,
    twiddles: Arc<TwiddleTable<T>>,
    bitrev: Arc<BitRevTable>,
}

impl<T: Float> FftEngine<T> {
    /// Build an engine for order `M` (`N = 2^M`), `1 <= M <= 20`.
    pub fn new(order: u32) -> Self {
        debug_assert!(
            (1..=20).contains(&order),
            "FFT order must be in [1, 20], got {order}"
        );
        if order > 12 {
            log::debug!("constructing FFT tables for order {order} (N = {})", 1u64 << order);
        }
        Self {
            order,
            n: 1usize << order,
            twiddles: Arc::new(TwiddleTable::new(order)),
            bitrev: Arc::new(BitRevTable::new(order)),
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

    /// Out-of-place forward transform: natural-order input, natural-order
    /// output, no `1/N` scaling.
    pub fn forward(&self, in_re: &[T], in_im: &[T], out_re: &mut [T], out_im: &mut [T]) {
        debug_assert_eq!(in_re.len(), self.n);
        debug_assert_eq!(in_im.len(), self.n);
        debug_assert_eq!(out_re.len(), self.n);
        debug_assert_eq!(out_im.len(), self.n);

        self.permute_into(in_re, in_im, out_re, out_im);
        self.run_dit_stages(out_re, out_im, false);
    }

    /// Forward transform of a `T`-interleaved complex input buffer
    /// (`in_interleaved[2n], in_interleaved[2n+1]` is sample `n`'s
    /// `(re, im)`), used by the real-FFT's packed-sequence step so it
    /// never needs a deinterleaving scratch buffer.
    pub fn forward_interleaved(&self, in_interleaved: &[T], out_re: &mut [T], out_im: &mut [T]) {
        debug_assert_eq!(in_interleaved.len(), 2 * self.n);
        debug_assert_eq!(out_re.len(), self.n);
        debug_assert_eq!(out_im.len(), self.n);

        for i in 0..self.n {
            let j = self.bitrev.get(i);
            out_re[j] = in_interleaved[2 * i];
            out_im[j] = in_interleaved[2 * i + 1];
        }
        self.run_dit_stages(out_re, out_im, false);
    }

    /// Swap pairs `(i, bitrev(i))` in place. Used to turn a natural-order
    /// buffer into bit-reversed order (or back) without an out-of-place
    /// scratch copy, at the cost of running the permutation as swaps
    /// instead of a single linear pass.
    pub fn permute_in_place(&self, re: &mut [T], im: &mut [T]) {
        debug_assert_eq!(re.len(), self.n);
        debug_assert_eq!(im.len(), self.n);
        for i in 0..self.n {
            let j = self.bitrev.get(i);
            if i < j {
                re.swap(i, j);
                im.swap(i, j);
            }
        }
    }

    /// Forward transform of an interleaved complex input buffer.
    pub fn forward_complex(&self, in_cx: &[Complex<T>], out_re: &mut [T], out_im: &mut [T]) {
        debug_assert_eq!(in_cx.len(), self.n);
        debug_assert_eq!(out_re.len(), self.n);
        debug_assert_eq!(out_im.len(), self.n);

        for (i, c) in in_cx.iter().enumerate() {
            let j = self.bitrev.get(i);
            out_re[j] = c.re;
            out_im[j] = c.im;
        }
        self.run_dit_stages(out_re, out_im, false);
    }

    /// `forward(in_cx) -> out_cx`: the fully `Complex<T>`-in, `Complex<T>`-out
    /// form, for callers that never want split real/imag buffers at all.
    /// Built on `forward_complex` plus a final zip into `out_cx`, not a
    /// separate butterfly path. Allocates scratch real/imag buffers, so
    /// unlike every other method on this type it is not hot-path safe —
    /// callers on a real-time path should use `forward_complex` (or
    /// `forward`) with buffers they own instead.
    pub fn forward_complex_to_complex(&self, in_cx: &[Complex<T>], out_cx: &mut [Complex<T>]) {
        debug_assert_eq!(in_cx.len(), self.n);
        debug_assert_eq!(out_cx.len(), self.n);

        let mut out_re = vec![T::ZERO; self.n];
        let mut out_im = vec![T::ZERO; self.n];
        self.forward_complex(in_cx, &mut out_re, &mut out_im);
        for i in 0..self.n {
            out_cx[i] = Complex::new(out_re[i], out_im[i]);
        }
    }

    /// Forward transform where the caller guarantees the second half of
    /// the (conceptually length-`N`) input is zero; `in_cx` need only
    /// supply the first `N/2` samples.
    pub fn forward_first_half_zero(&self, in_cx: &[Complex<T>], out_re: &mut [T], out_im: &mut [T]) {
        debug_assert_eq!(in_cx.len(), self.n / 2);
        debug_assert_eq!(out_re.len(), self.n);
        debug_assert_eq!(out_im.len(), self.n);

        out_re.fill(T::ZERO);
        out_im.fill(T::ZERO);
        for (i, c) in in_cx.iter().enumerate() {
            let j = self.bitrev.get(i);
            out_re[j] = c.re;
            out_im[j] = c.im;
        }
        self.run_dit_stages(out_re, out_im, false);
    }

    /// In-place decimation-in-frequency forward transform. Input is
    /// natural order; output is left in bit-reversed order (no permutation
    /// is applied).
    pub fn forward_in_place_dif(&self, inout_re: &mut [T], inout_im: &mut [T]) {
        debug_assert_eq!(inout_re.len(), self.n);
        debug_assert_eq!(inout_im.len(), self.n);
        self.run_dif_stages(inout_re, inout_im, false);
    }

    /// In-place decimation-in-time inverse transform. Input is assumed
    /// already in bit-reversed order (e.g. the output of
    /// `forward_in_place_dif`); output is natural order. No `1/N` scaling.
    pub fn inverse_in_place_dit(&self, inout_re: &mut [T], inout_im: &mut [T]) {
        debug_assert_eq!(inout_re.len(), self.n);
        debug_assert_eq!(inout_im.len(), self.n);
        self.run_dit_stages(inout_re, inout_im, true);
    }

    /// Out-of-place inverse transform via the imag/real swap trick: no
    /// separate inverse butterfly code path is needed. No `1/N` scaling.
    pub fn inverse(&self, in_re: &[T], in_im: &[T], out_re: &mut [T], out_im: &mut [T]) {
        self.forward(in_im, in_re, out_im, out_re);
    }

    /// Element-wise window application, vectorized identically to the PCM
    /// codec kernels (plain `zip`, left to autovectorize).
    pub fn apply_window(&self, inout: &mut [T], window: &[T]) {
        debug_assert_eq!(inout.len(), window.len());
        for (x, &w) in inout.iter_mut().zip(window.iter()) {
            *x = *x * w;
        }
    }

    /// Undo the bit-reversed ordering left by `forward_in_place_dif` while
    /// producing an interleaved complex buffer.
    pub fn bit_reverse_and_interleave(&self, in_re: &[T], in_im: &[T], out_interleaved: &mut [T]) {
        debug_assert_eq!(in_re.len(), self.n);
        debug_assert_eq!(in_im.len(), self.n);
        debug_assert_eq!(out_interleaved.len(), 2 * self.n);
        for i in 0..self.n {
            let j = self.bitrev.get(i);
            out_interleaved[2 * i] = in_re[j];
            out_interleaved[2 * i + 1] = in_im[j];
        }
    }

    fn permute_into(&self, in_re: &[T], in_im: &[T], out_re: &mut [T], out_im: &mut [T]) {
        for i in 0..self.n {
            let j = self.bitrev.get(i);
            out_re[j] = in_re[i];
            out_im[j] = in_im[i];
        }
    }

    /// Increasing-span DIT butterfly sweep (stages `1..=order`), used by
    /// both the out-of-place forward (on bit-reversed-permuted data) and
    /// `inverse_in_place_dit` (`conjugate = true` uses `conj(W)` in place
    /// of `W`, the standard way to get the inverse transform out of the
    /// forward butterfly).
    fn run_dit_stages(&self, data_re: &mut [T], data_im: &mut [T], conjugate: bool) {
        for s in 1..=self.order {
            let span = 1usize << s;
            let half = span >> 1;
            let (w_re, w_im) = self.twiddles.stage(s);
            let mut base = 0;
            while base < self.n {
                if half == 1 {
                    let a_re = data_re[base];
                    let a_im = data_im[base];
                    let b_re = data_re[base + 1];
                    let b_im = data_im[base + 1];
                    data_re[base] = a_re + b_re;
                    data_im[base] = a_im + b_im;
                    data_re[base + 1] = a_re - b_re;
                    data_im[base + 1] = a_im - b_im;
                } else {
                    for k in 0..half {
                        let i0 = base + k;
                        let i1 = i0 + half;
                        let (wr, wi) = (w_re[k], if conjugate { -w_im[k] } else { w_im[k] });
                        let (tr, ti) = cmul(data_re[i1], data_im[i1], wr, wi);
                        let a_re = data_re[i0];
                        let a_im = data_im[i0];
                        data_re[i0] = a_re + tr;
                        data_im[i0] = a_im + ti;
                        data_re[i1] = a_re - tr;
                        data_im[i1] = a_im - ti;
                    }
                }
                base += span;
            }
        }
    }

    /// Decreasing-span DIF butterfly sweep (stages `order..=1`), used by
    /// `forward_in_place_dif`. `conjugate` is plumbed through for
    /// symmetry with `run_dit_stages` but unused by any current caller.
    fn run_dif_stages(&self, data_re: &mut [T], data_im: &mut [T], conjugate: bool) {
        for s in (1..=self.order).rev() {
            let span = 1usize << s;
            let half = span >> 1;
            let (w_re, w_im) = self.twiddles.stage(s);
            let mut base = 0;
            while base < self.n {
                if half == 1 {
                    let a_re = data_re[base];
                    let a_im = data_im[base];
                    let b_re = data_re[base + 1];
                    let b_im = data_im[base + 1];
                    data_re[base] = a_re + b_re;
                    data_im[base] = a_im + b_im;
                    data_re[base + 1] = a_re - b_re;
                    data_im[base + 1] = a_im - b_im;
                } else {
                    for k in 0..half {
                        let i0 = base + k;
                        let i1 = i0 + half;
                        let (wr, wi) = (w_re[k], if conjugate { -w_im[k] } else { w_im[k] });
                        let a_re = data_re[i0];
                        let a_im = data_im[i0];
                        let b_re = data_re[i1];
                        let b_im = data_im[i1];
                        let sum_re = a_re + b_re;
                        let sum_im = a_im + b_im;
                        let diff_re = a_re - b_re;
                        let diff_im = a_im - b_im;
                        let (dr, di) = cmul(diff_re, diff_im, wr, wi);
                        data_re[i0] = sum_re;
                        data_im[i0] = sum_im;
                        data_re[i1] = dr;
                        data_im[i1] = di;
                    }
                }
                base += span;
            }
        }
    }
}
