//! The scalar-type abstraction the generic butterfly kernels in `engine.rs`
//! are written against, so one implementation covers both `f32` and `f64`.
//!
//! There is deliberately no `LANE_COUNT`/`load`/`store` SIMD surface here:
//! every butterfly loop is written as a plain straight-line pass that LLVM
//! autovectorizes, and `mul_add` is the one operation that matters for
//! getting fused-multiply-add precision and throughput on targets that
//! support it.

/// A floating-point scalar usable as an FFT sample type (`f32` or `f64`).
pub trait Float:
    Copy
    + Clone
    + Default
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Neg<Output = Self>
    + std::fmt::Debug
    + PartialEq
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;
    const ONE: Self;

    /// `self * a + b`, using a fused multiply-add where the target supports it.
    fn mul_add(self, a: Self, b: Self) -> Self;

    /// Narrow a full-precision twiddle computed in `f64` to this storage type.
    /// Twiddles are always generated at `f64` precision regardless of `Self`,
    /// which is more accurate than computing `cos`/`sin` on the fly at `f32`.
    fn from_f64(v: f64) -> Self;

    fn to_f64(self) -> f64;

    fn abs(self) -> Self;
    fn recip(self) -> Self;
}

impl Float for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn mul_add(self, a: Self, b: Self) -> Self {
        f32::mul_add(self, a, b)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn recip(self) -> Self {
        1.0 / self
    }
}

impl Float for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn mul_add(self, a: Self, b: Self) -> Self {
        f64::mul_add(self, a, b)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn recip(self) -> Self {
        1.0 / self
    }
}
