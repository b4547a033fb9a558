//! Hot-path allocation guard: no allocation is allowed once an `FftEngine`,
//! `RealFftEngine`, or `Convolver` is constructed. A dedicated test binary
//! installs the allocator hook and wraps each hot-path call, so a
//! regression that sneaks a `Vec`/`Box` allocation into `forward`,
//! `convolve`, or a PCM kernel is caught here instead of showing up as a
//! glitch in a running audio callback.

use assert_no_alloc::*;
use dsp_core::convolver::{Convolver, Partition};
use dsp_core::fft::{FftEngine, RealFftEngine};
use dsp_core::pcm::{float_to_s16, s16_to_float};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

#[test]
fn complex_forward_does_not_allocate() {
    let engine = FftEngine::<f32>::new(8);
    let n = engine.len();
    let in_re = vec![0.3f32; n];
    let in_im = vec![0.0f32; n];
    let mut out_re = vec![0.0f32; n];
    let mut out_im = vec![0.0f32; n];

    assert_no_alloc(|| {
        engine.forward(&in_re, &in_im, &mut out_re, &mut out_im);
    });
}

#[test]
fn real_forward_does_not_allocate() {
    let engine = RealFftEngine::<f32>::new(9);
    let n = engine.len();
    let x = vec![0.3f32; n];
    let mut out_re = vec![0.0f32; n / 2];
    let mut out_im = vec![0.0f32; n / 2];

    assert_no_alloc(|| {
        engine.forward_real(&x, &mut out_re, &mut out_im);
    });
}

#[test]
fn convolve_does_not_allocate() {
    let order = 8;
    let n = 1usize << order;
    let max_partitions = 4;
    let conv = Convolver::<f32>::new(order, max_partitions);
    let mut partitions = vec![Partition::zeroed(n); max_partitions];
    let impulse: Vec<f32> = (0..max_partitions * n).map(|i| ((i * 3 + 1) % 13) as f32 / 13.0).collect();
    let count = conv.init_kernel(&mut partitions, &impulse).unwrap();

    let mut conv = conv;
    let mut block: Vec<f32> = (0..n).map(|i| (i as f32 * 0.01).sin()).collect();

    assert_no_alloc(|| {
        conv.convolve(&mut block, &partitions[..count]);
    });
}

#[test]
fn pcm_conversion_does_not_allocate() {
    let input: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.002).sin()).collect();
    let mut ints = vec![0i16; 1024];
    let mut back = vec![0.0f32; 1024];

    assert_no_alloc(|| {
        float_to_s16(&input, &mut ints);
        s16_to_float(&ints, &mut back);
    });
}
