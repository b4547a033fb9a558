//! Stride-N channel de-interleaving (and its inverse) for `f32` buffers.

/// Split a stride-2 interleaved buffer into two channels.
pub fn deinterleave_2(interleaved: &[f32], ch0: &mut [f32], ch1: &mut [f32]) {
    debug_assert_eq!(interleaved.len(), ch0.len() * 2);
    debug_assert_eq!(ch0.len(), ch1.len());
    for (i, frame) in interleaved.chunks_exact(2).enumerate() {
        ch0[i] = frame[0];
        ch1[i] = frame[1];
    }
}

/// Split a stride-4 interleaved buffer into four channels.
pub fn deinterleave_4(
    interleaved: &[f32],
    ch0: &mut [f32],
    ch1: &mut [f32],
    ch2: &mut [f32],
    ch3: &mut [f32],
) {
    debug_assert_eq!(interleaved.len(), ch0.len() * 4);
    debug_assert!(ch0.len() == ch1.len() && ch1.len() == ch2.len() && ch2.len() == ch3.len());
    for (i, frame) in interleaved.chunks_exact(4).enumerate() {
        ch0[i] = frame[0];
        ch1[i] = frame[1];
        ch2[i] = frame[2];
        ch3[i] = frame[3];
    }
}

/// Recombine two channels into a stride-2 interleaved buffer.
pub fn interleave_2(ch0: &[f32], ch1: &[f32], interleaved: &mut [f32]) {
    debug_assert_eq!(ch0.len(), ch1.len());
    debug_assert_eq!(interleaved.len(), ch0.len() * 2);
    for (i, frame) in interleaved.chunks_exact_mut(2).enumerate() {
        frame[0] = ch0[i];
        frame[1] = ch1[i];
    }
}

/// Recombine four channels into a stride-4 interleaved buffer.
pub fn interleave_4(ch0: &[f32], ch1: &[f32], ch2: &[f32], ch3: &[f32], interleaved: &mut [f32]) {
    debug_assert!(ch0.len() == ch1.len() && ch1.len() == ch2.len() && ch2.len() == ch3.len());
    debug_assert_eq!(interleaved.len(), ch0.len() * 4);
    for (i, frame) in interleaved.chunks_exact_mut(4).enumerate() {
        frame[0] = ch0[i];
        frame[1] = ch1[i];
        frame[2] = ch2[i];
        frame[3] = ch3[i];
    }
}
