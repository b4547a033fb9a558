//! The one data-dependent failure in the core: the caller's impulse
//! response doesn't fit in the partitions the convolver was built with.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConvolverError {
    #[error(
        "impulse response of {input_len} samples needs {needed} partitions of {block_size} \
         samples each, but this convolver only has room for {max_partitions}"
    )]
    KernelTooLong {
        input_len: usize,
        needed: usize,
        block_size: usize,
        max_partitions: usize,
    },
}
