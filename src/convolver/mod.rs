//! Partitioned frequency-domain convolver: long-kernel FIR convolution via
//! overlap-save, with the kernel split into fixed-size partitions and a
//! cooperative "initial / resume / finalize" API for spreading the
//! per-frame cost across successive calls.
//!
//! Builds on this crate's own [`RealFftEngine`] rather than a third-party
//! FFT crate, and processes one block at a time rather than sample by
//! sample.

mod error;

pub use error::ConvolverError;

use crate::fft::{cmul, Float, RealFftEngine};
use serde::{Deserialize, Serialize};

/// One frequency-domain kernel slice: the real/imag halves of a `2N`-point
/// real-FFT of one `N`-sample block of a (possibly zero-padded) impulse
/// response.
#[derive(Debug, Clone)]
pub struct Partition<T: Float> {
    pub re: Vec<T>,
    pub im: Vec<T>,
}

impl<T: Float> Partition<T> {
    pub fn zeroed(n: usize) -> Self {
        Self {
            re: vec![T::ZERO; n],
            im: vec![T::ZERO; n],
        }
    }

    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }
}

/// The scalar type a [`Convolver`] (or the embedding application's config)
/// is parameterized over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    F32,
    F64,
}

/// `{ order M, max_partitions K, scalar type }` configuration for
/// constructing a [`Convolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvolverConfig {
    pub order: u32,
    pub max_partitions: usize,
    pub scalar: ScalarKind,
}

/// The cooperative API's state machine. Calling a cooperative method out
/// of the `Idle -> FrameInFlight(P-1) -> FrameInFlight(n-m) -> ... ->
/// ReadyToEmit -> Idle` order is a contract violation: a debug assertion
/// in this build, undefined behavior in release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConvolverState {
    Idle,
    FrameInFlight(usize),
    ReadyToEmit,
}

/// Partitioned overlap-save convolver for order `M` (block size `N = 2^M`,
/// FFT size `2N`), supporting up to `max_partitions` kernel partitions.
///
/// Exclusively owns its accumulation ring, previous-tail buffer, and
/// last-input frequency-domain transform; the
/// caller owns the frequency-domain kernel array passed to each `convolve*`
/// call, produced once by [`Convolver::init_kernel`].
pub struct Convolver<T: Float> {
    order: u32,
    n: usize,
    max_partitions: usize,
    real_fft: RealFftEngine<T>,

    accumulator: Vec<Partition<T>>,
    head: usize,

    prev_input: Vec<T>,
    last_input_fd: Partition<T>,
    prev_tail: Vec<T>,

    input_has_data: bool,
    state: ConvolverState,

    frame_scratch: Vec<T>,
}

impl<T: Float> Convolver<T> {
    /// Build a convolver for order `M` (`1 <= M <= 20`) with room for up to
    /// `max_partitions` kernel partitions.
    pub fn new(order: u32, max_partitions: usize) -> Self {
        debug_assert!((1..=20).contains(&order), "convolver order must be in [1, 20], got {order}");
        debug_assert!(max_partitions > 0, "max_partitions must be positive");
        let n = 1usize << order;
        log::debug!("constructing convolver: order {order} (block {n}), {max_partitions} partitions");
        Self {
            order,
            n,
            max_partitions,
            real_fft: RealFftEngine::new(order + 1),
            accumulator: (0..max_partitions).map(|_| Partition::zeroed(n)).collect(),
            head: 0,
            prev_input: vec![T::ZERO; n],
            last_input_fd: Partition::zeroed(n),
            prev_tail: vec![T::ZERO; n],
            input_has_data: false,
            state: ConvolverState::Idle,
            frame_scratch: vec![T::ZERO; 2 * n],
        }
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn block_len(&self) -> usize {
        self.n
    }

    pub fn max_partitions(&self) -> usize {
        self.max_partitions
    }

    pub fn has_input_data(&self) -> bool {
        self.input_has_data
    }

    /// Partitions still owed compute on the frame currently in flight.
    pub fn leftover_partitions(&self) -> usize {
        match self.state {
            ConvolverState::FrameInFlight(n) => n,
            _ => 0,
        }
    }

    /// Reset all internal state (accumulator, ring position, tail, previous
    /// input) to the freshly-constructed state. Does not affect any
    /// kernel the caller is holding.
    pub fn reset(&mut self) {
        for p in &mut self.accumulator {
            p.re.fill(T::ZERO);
            p.im.fill(T::ZERO);
        }
        self.head = 0;
        self.prev_input.fill(T::ZERO);
        self.prev_tail.fill(T::ZERO);
        self.input_has_data = false;
        self.state = ConvolverState::Idle;
    }

    /// Partition a contiguous impulse response into frequency-domain
    /// kernel blocks. `partitions` must have at least
    /// `ceil(impulse.len() / N)` elements (and no more than
    /// `max_partitions`); returns the number actually written, or
    /// [`ConvolverError::KernelTooLong`] if the impulse response needs more
    /// partitions than either `partitions` or this convolver can hold.
    pub fn init_kernel(&self, partitions: &mut [Partition<T>], impulse: &[T]) -> Result<usize, ConvolverError> {
        let count = impulse.len().div_ceil(self.n);
        if count > partitions.len() || count > self.max_partitions {
            return Err(ConvolverError::KernelTooLong {
                input_len: impulse.len(),
                needed: count,
                block_size: self.n,
                max_partitions: self.max_partitions,
            });
        }
        if count > 0 {
            log::debug!(
                "init_kernel: partitioning {} samples into {count} partition(s) of {} samples",
                impulse.len(),
                self.n
            );
        }

        let mut time_block = vec![T::ZERO; 2 * self.n];
        for p in 0..count {
            time_block.fill(T::ZERO);
            let start = p * self.n;
            let end = (start + self.n).min(impulse.len());
            time_block[..end - start].copy_from_slice(&impulse[start..end]);
            self.real_fft.forward_real(&time_block, &mut partitions[p].re, &mut partitions[p].im);
        }
        Ok(count)
    }

    /// One-shot convolution: transforms `inout` as the next input block,
    /// multiply-accumulates against every partition of `kernel`, and
    /// overwrites `inout` with the next output block.
    pub fn convolve(&mut self, inout: &mut [T], kernel: &[Partition<T>]) {
        debug_assert_eq!(inout.len(), self.n);
        self.convolve_initial_first_stage(inout, kernel);
        if kernel.len() > 1 {
            self.convolve_resume_partial(kernel, 1, kernel.len());
        }
        self.convolve_initial_last_stage(inout);
    }

    /// One-shot two-kernel crossfade: multiplies the input spectrum against
    /// `gain_a * kernel_a[p] + gain_b * kernel_b[p]` on each partition.
    /// `kernel_a` and `kernel_b` must have the same partition count; the
    /// caller zero-pads the shorter kernel.
    pub fn convolve_mix(
        &mut self,
        inout: &mut [T],
        kernel_a: &[Partition<T>],
        gain_a: T,
        kernel_b: &[Partition<T>],
        gain_b: T,
    ) {
        debug_assert_eq!(inout.len(), self.n);
        debug_assert_eq!(
            kernel_a.len(),
            kernel_b.len(),
            "convolve_mix requires equal partition counts; zero-pad the shorter kernel"
        );
        self.first_stage_mix(inout, kernel_a, gain_a, kernel_b, gain_b);
        if kernel_a.len() > 1 {
            self.resume_mix(kernel_a, gain_a, kernel_b, gain_b, 1, kernel_a.len());
        }
        self.convolve_initial_last_stage(inout);
    }

    /// Cooperative API, stage 1 of 3: transform the next input block and
    /// multiply-accumulate only the first (`p = 0`) partition into its
    /// accumulator slot. `Idle -> FrameInFlight(count - 1)` (or straight to
    /// `ReadyToEmit` if `count == 1`).
    pub fn convolve_initial_first_stage(&mut self, input: &[T], kernel: &[Partition<T>]) {
        debug_assert_eq!(self.state, ConvolverState::Idle, "convolve_initial_first_stage called out of order");
        debug_assert!(!kernel.is_empty() && kernel.len() <= self.max_partitions);
        self.transform_frame(input);
        let idx = self.head % self.max_partitions;
        mac_into(&mut self.accumulator[idx], &self.last_input_fd, &kernel[0]);
        self.input_has_data = true;
        self.state = if kernel.len() == 1 {
            ConvolverState::ReadyToEmit
        } else {
            ConvolverState::FrameInFlight(kernel.len() - 1)
        };
    }

    /// Cooperative API, stage 2 of 3 (call as many times as needed to tile
    /// `[1, count)`): multiply-accumulate partitions `[start, end)` into
    /// their respective ring slots.
    pub fn convolve_resume_partial(&mut self, kernel: &[Partition<T>], start: usize, end: usize) {
        let ConvolverState::FrameInFlight(leftover) = self.state else {
            debug_assert!(false, "convolve_resume_partial called out of order");
            return;
        };
        debug_assert!(start >= 1 && start <= end && end <= kernel.len());
        let head = self.head;
        let k = self.max_partitions;
        for p in start..end {
            let idx = (head + p) % k;
            mac_into(&mut self.accumulator[idx], &self.last_input_fd, &kernel[p]);
        }
        let done = end - start;
        debug_assert!(done <= leftover, "resumed more partitions than were left");
        let remaining = leftover - done;
        self.state = if remaining == 0 {
            ConvolverState::ReadyToEmit
        } else {
            ConvolverState::FrameInFlight(remaining)
        };
    }

    /// Cooperative API, stage 3 of 3: once `leftover_partitions() == 0`,
    /// inverse-transform the head accumulator, add the saved overlap-save
    /// tail, store the new tail, rotate the ring, and emit the output
    /// block. `ReadyToEmit -> Idle`.
    pub fn convolve_initial_last_stage(&mut self, output: &mut [T]) {
        debug_assert_eq!(self.state, ConvolverState::ReadyToEmit, "convolve_initial_last_stage called out of order");
        debug_assert_eq!(output.len(), self.n);

        let n = self.n;
        let k = self.max_partitions;
        let idx = self.head % k;

        let acc = &mut self.accumulator[idx];
        self.real_fft.inverse_real_clobber_input(&mut acc.re, &mut acc.im, &mut self.frame_scratch);

        // Undo the un-normalized inverse FFT: transforms in this crate never
        // scale by 1/N on their own.
        let scale = T::from_f64(1.0 / (2 * n) as f64);
        for v in &mut self.frame_scratch {
            *v = *v * scale;
        }

        for i in 0..n {
            output[i] = self.frame_scratch[n + i] + self.prev_tail[i];
        }
        self.prev_tail.copy_from_slice(&self.frame_scratch[..n]);

        self.accumulator[idx].re.fill(T::ZERO);
        self.accumulator[idx].im.fill(T::ZERO);

        self.head = (self.head + 1) % k;
        self.state = ConvolverState::Idle;
    }

    /// Build the `2N` overlap-save frame (previous block || current block),
    /// real-FFT it into `last_input_fd`, and slide `prev_input` forward.
    fn transform_frame(&mut self, input: &[T]) {
        debug_assert_eq!(input.len(), self.n);
        let n = self.n;
        self.frame_scratch[..n].copy_from_slice(&self.prev_input);
        self.frame_scratch[n..].copy_from_slice(input);
        self.real_fft
            .forward_real(&self.frame_scratch, &mut self.last_input_fd.re, &mut self.last_input_fd.im);
        self.prev_input.copy_from_slice(input);
    }

    fn first_stage_mix(&mut self, input: &[T], ka: &[Partition<T>], ga: T, kb: &[Partition<T>], gb: T) {
        debug_assert_eq!(self.state, ConvolverState::Idle, "convolve_mix called out of order");
        debug_assert!(!ka.is_empty() && ka.len() <= self.max_partitions);
        self.transform_frame(input);
        let idx = self.head % self.max_partitions;
        mac_into_mix(&mut self.accumulator[idx], &self.last_input_fd, &ka[0], ga, &kb[0], gb);
        self.input_has_data = true;
        self.state = if ka.len() == 1 {
            ConvolverState::ReadyToEmit
        } else {
            ConvolverState::FrameInFlight(ka.len() - 1)
        };
    }

    fn resume_mix(&mut self, ka: &[Partition<T>], ga: T, kb: &[Partition<T>], gb: T, start: usize, end: usize) {
        let ConvolverState::FrameInFlight(leftover) = self.state else {
            debug_assert!(false, "convolve_mix resume called out of order");
            return;
        };
        let head = self.head;
        let k = self.max_partitions;
        for p in start..end {
            let idx = (head + p) % k;
            mac_into_mix(&mut self.accumulator[idx], &self.last_input_fd, &ka[p], ga, &kb[p], gb);
        }
        let done = end - start;
        let remaining = leftover - done;
        self.state = if remaining == 0 {
            ConvolverState::ReadyToEmit
        } else {
            ConvolverState::FrameInFlight(remaining)
        };
    }
}

/// `acc += x * h`, with bin 0 special-cased: the packed real-FFT layout
/// stores DC in the real lane and Nyquist in the imaginary lane of bin 0,
/// so they multiply as independent reals rather than as one complex pair.
fn mac_into<T: Float>(acc: &mut Partition<T>, x: &Partition<T>, h: &Partition<T>) {
    acc.re[0] = acc.re[0] + x.re[0] * h.re[0];
    acc.im[0] = acc.im[0] + x.im[0] * h.im[0];
    for k in 1..acc.re.len() {
        let (pr, pi) = cmul(x.re[k], x.im[k], h.re[k], h.im[k]);
        acc.re[k] = acc.re[k] + pr;
        acc.im[k] = acc.im[k] + pi;
    }
}

/// `acc += x * (ha * gain_a + hb * gain_b)`, same bin-0 special case.
fn mac_into_mix<T: Float>(acc: &mut Partition<T>, x: &Partition<T>, ha: &Partition<T>, gain_a: T, hb: &Partition<T>, gain_b: T) {
    acc.re[0] = acc.re[0] + x.re[0] * (ha.re[0] * gain_a + hb.re[0] * gain_b);
    acc.im[0] = acc.im[0] + x.im[0] * (ha.im[0] * gain_a + hb.im[0] * gain_b);
    for k in 1..acc.re.len() {
        let hr = ha.re[k] * gain_a + hb.re[k] * gain_b;
        let hi = ha.im[k] * gain_a + hb.im[k] * gain_b;
        let (pr, pi) = cmul(x.re[k], x.im[k], hr, hi);
        acc.re[k] = acc.re[k] + pr;
        acc.im[k] = acc.im[k] + pi;
    }
}
