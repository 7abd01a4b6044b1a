use thiserror::Error;

/// Errors reported by fallible [`BitSet`](crate::BitSet) operations.
///
/// Contract violations such as out-of-bounds indices or mismatched operand
/// sizes are not represented here. Those panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The allocator could not provide storage for the requested capacity.
    #[error("failed to allocate {natoms} atoms for a bitset of {nbits} bits")]
    AllocationFailure {
        /// Requested bit capacity.
        nbits: usize,
        /// Number of atoms that would have been needed.
        natoms: usize,
    },
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
