//! PCM sample-format conversion kernels.
//!
//! Bulk, non-streaming conversion between packed integer PCM and normalized
//! `f32`, with optional triangular dither on bit-depth reduction. No
//! allocation, no state beyond an explicit dither seed threaded by the
//! caller.

mod convert;
mod deinterleave;
mod dither;
mod s24;

pub use convert::{
    f64_to_float, float_to_s16, float_to_s32, float_to_u8, s16_to_float, s16_to_s32,
    s24_to_float, s24_to_s16_truncating, s24_to_s32, s24_to_u8_truncating, s32_to_float,
    s64_to_float, u8_to_float, u8_to_s16, u8_to_s32,
};
pub use deinterleave::{deinterleave_2, deinterleave_4, interleave_2, interleave_4};
pub use dither::{
    f32_to_s16_dithered, f32_to_u8_dithered, s24_to_s16_dithered, s24_to_u8_dithered, DitherState,
};
pub use s24::S24;
