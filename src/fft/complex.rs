//! Split-array complex arithmetic helpers.
//!
//! Twiddle and spectrum data live as two parallel real/imag arrays rather
//! than one interleaved `Complex<T>` array, so the butterfly loops below
//! work directly on `(re: T, im: T)` pairs instead of a `num_complex`-style
//! struct. This module only holds the scalar-pair operations those loops
//! are built from.

use super::float::Float;

/// `(a + bi)(c + di) = (ac − bd, ad + bc)`, computed with `mul_add` so the
/// real and imaginary parts each cost one FMA plus one multiply-subtract
/// instead of two multiplies and an add/sub.
#[inline]
pub fn cmul<T: Float>(a_re: T, a_im: T, b_re: T, b_im: T) -> (T, T) {
    let re = a_re.mul_add(b_re, -(a_im * b_im));
    let im = a_re.mul_add(b_im, a_im * b_re);
    (re, im)
}
