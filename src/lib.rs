//! A compact, heap-backed bitset over a dense index range.
//! `no_std` + `alloc`, no `unsafe`.
//!
//! [`BitSet`] is the main struct in this library. It stores `nbits` bits in a
//! buffer of `u64` atoms and is sized once at construction. Its capacity only
//! changes through an explicit [`BitSet::resize`].
//!
//! # Examples
//! ```
//! use dense_bitset::BitSet;
//!
//! let mut bitset = BitSet::new(10)?;
//! assert_eq!(bitset.popcount(), 0);
//! bitset.set(3);
//! bitset.set(7);
//! assert_eq!(bitset.popcount(), 2);
//! assert_eq!(bitset.first_set(), Some(3));
//! assert_eq!(bitset.next_set(4), Some(7));
//! assert_eq!(bitset.next_set(8), None);
//! # Ok::<(), dense_bitset::Error>(())
//! ```
//!
//! # Use Cases
//!
//! - Marking visited nodes in a graph traversal
//! - Flags over a dense range of object IDs
//! - Fast intersection and union of membership sets
//! - Not a sparse set: memory is proportional to the highest index, not to
//!   the number of members
//! - Not an iteration-first structure: walking set bits one by one with
//!   `next_set` works, but set algebra is where it shines
//!
//! # Features
//!
//! - `#![no_std]` compatible (disable the default `std` feature)
//! - Fallible allocation: [`BitSet::new`] and [`BitSet::resize`] report
//!   [`Error::AllocationFailure`] instead of aborting
//! - Single-bit operations: `set`, `unset`, `get`, `set_to`, `toggle`
//! - Scanning: `popcount`, `first_set`, `next_set`
//! - Set algebra between bitsets of equal size:
//!   - `intersection_of`, `union_of` (into a third bitset)
//!   - `intersect_with`, `union_with` (in place)
//!   - `&`, `|`, `&=`, `|=`
//! - Lifecycle events are reported through [`tracing`]

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod bitset;
mod error;

pub use bitset::{Atom, BITS_PER_ATOM, BitSet, atom_count};
pub use error::{Error, Result};
