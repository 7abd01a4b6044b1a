use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use tracing::{trace, warn};

use crate::error::{Error, Result};

/// The storage word of a [`BitSet`].
pub type Atom = u64;

/// Number of bits held by a single [`Atom`].
pub const BITS_PER_ATOM: usize = Atom::BITS as usize;

/// Computes the number of atoms needed to store `bit_count` bits.
///
/// # Examples
/// ```
/// use dense_bitset::atom_count;
///
/// assert_eq!(atom_count(0), 0);
/// assert_eq!(atom_count(64), 1);
/// assert_eq!(atom_count(65), 2);
/// ```
pub const fn atom_count(bit_count: usize) -> usize {
    bit_count.div_ceil(BITS_PER_ATOM)
}

/// Reserves exactly `natoms` more atoms in `atoms`, reporting failure instead
/// of aborting.
fn try_reserve_atoms(atoms: &mut Vec<Atom>, natoms: usize, nbits: usize) -> Result<()> {
    let additional = natoms.saturating_sub(atoms.len());
    atoms.try_reserve_exact(additional).map_err(|err| {
        warn!(nbits, natoms, %err, "bitset allocation failed");
        Error::AllocationFailure { nbits, natoms }
    })
}

/// A fixed-capacity set of indices in `[0, nbits)`.
///
/// Internally stores bits in a heap buffer of [`Atom`]s, least significant
/// bit first. Bits of the last atom beyond `nbits` (the padding tail) are
/// always kept unset.
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct BitSet {
    nbits: usize,
    atoms: Vec<Atom>,
}

impl BitSet {
    /// Creates a new bitset able to hold `nbits` bits, all unset.
    ///
    /// A capacity of zero is valid and allocates nothing.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailure`] if the buffer cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let bitset = BitSet::new(100)?;
    /// assert_eq!(bitset.nbits(), 100);
    /// assert_eq!(bitset.natoms(), 2);
    /// assert_eq!(bitset.popcount(), 0);
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    pub fn new(nbits: usize) -> Result<Self> {
        let natoms = atom_count(nbits);
        let mut atoms = Vec::new();
        try_reserve_atoms(&mut atoms, natoms, nbits)?;
        atoms.resize(natoms, 0);
        trace!(nbits, natoms, "bitset initialized");
        Ok(Self { nbits, atoms })
    }

    /// Releases the bitset and its buffer.
    ///
    /// Equivalent to dropping it. The bitset is moved, so it cannot be used
    /// afterwards:
    ///
    /// ```compile_fail
    /// use dense_bitset::BitSet;
    ///
    /// let bitset = BitSet::new(8).unwrap();
    /// bitset.release();
    /// bitset.get(0);
    /// ```
    pub fn release(self) {
        trace!(nbits = self.nbits, natoms = self.natoms(), "bitset released");
    }

    /// Overwrites every atom of `self` with the atoms of `src`.
    ///
    /// The capacity of `self` is left as is; only the contents are copied.
    /// Copied bits at or beyond `self.nbits()` are discarded.
    ///
    /// # Panics
    /// Panics if `self.natoms() != src.natoms()`.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut src = BitSet::new(70)?;
    /// src.set(69);
    /// let mut dest = BitSet::new(70)?;
    /// dest.copy_from(&src);
    /// assert!(dest.get(69));
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    pub fn copy_from(&mut self, src: &Self) {
        self.assert_same_atom_count(src);
        self.atoms.copy_from_slice(&src.atoms);
        self.clear_padding();
    }

    /// Changes the capacity to `nbits` bits.
    ///
    /// Bits below `min(old, new)` capacity keep their values. When growing,
    /// every newly addressable bit is unset. When shrinking, bits at or beyond
    /// the new capacity are discarded and the buffer is shrunk to fit.
    ///
    /// # Errors
    /// Returns [`Error::AllocationFailure`] if the larger buffer cannot be
    /// allocated. The bitset is left unchanged in that case.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(10)?;
    /// bitset.set(9);
    /// bitset.resize(200)?;
    /// assert!(bitset.get(9));
    /// assert!(!bitset.get(199));
    /// assert_eq!(bitset.natoms(), 4);
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    pub fn resize(&mut self, nbits: usize) -> Result<()> {
        let natoms = atom_count(nbits);
        try_reserve_atoms(&mut self.atoms, natoms, nbits)?;
        let old_nbits = self.nbits;
        self.atoms.resize(natoms, 0);
        self.atoms.shrink_to(natoms);
        self.nbits = nbits;
        self.clear_padding();
        trace!(old_nbits, nbits, natoms, "bitset resized");
        Ok(())
    }

    /// Returns the number of addressable bits.
    #[inline]
    pub fn nbits(&self) -> usize {
        self.nbits
    }

    /// Returns the number of atoms backing the bitset.
    #[inline]
    pub fn natoms(&self) -> usize {
        self.atoms.len()
    }

    #[cfg(test)]
    pub(crate) fn allocated_atoms(&self) -> usize {
        self.atoms.capacity()
    }

    /// Returns the raw atoms, least significant bit of atom 0 being bit 0.
    ///
    /// Together with [`nbits`](BitSet::nbits) this is everything needed to
    /// persist the bitset.
    #[inline]
    pub fn as_atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Sets the bit at the given index.
    ///
    /// # Panics
    /// Panics if `idx >= self.nbits()`.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(8)?;
    /// assert!(!bitset.get(3));
    /// bitset.set(3);
    /// assert!(bitset.get(3));
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.assert_in_bounds(idx);
        let (atom_idx, bit_idx) = Self::idxs(idx);
        self.atoms[atom_idx] |= Self::bit_mask(bit_idx);
    }

    /// Unsets the bit at the given index.
    ///
    /// # Panics
    /// Panics if `idx >= self.nbits()`.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(8)?;
    /// bitset.set(3);
    /// bitset.unset(3);
    /// assert!(!bitset.get(3));
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    #[inline]
    pub fn unset(&mut self, idx: usize) {
        self.assert_in_bounds(idx);
        let (atom_idx, bit_idx) = Self::idxs(idx);
        self.atoms[atom_idx] &= !Self::bit_mask(bit_idx);
    }

    /// Returns `true` if the bit at the given index is set.
    ///
    /// # Panics
    /// Panics if `idx >= self.nbits()`.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        self.assert_in_bounds(idx);
        let (atom_idx, bit_idx) = Self::idxs(idx);
        self.atoms[atom_idx] & Self::bit_mask(bit_idx) != 0
    }

    /// Sets the bit at the given index to `value`, whatever its current state.
    ///
    /// # Panics
    /// Panics if `idx >= self.nbits()`.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(8)?;
    /// bitset.set_to(5, true);
    /// bitset.set_to(5, true);
    /// assert!(bitset.get(5));
    /// bitset.set_to(5, false);
    /// assert!(!bitset.get(5));
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    #[inline]
    pub fn set_to(&mut self, idx: usize, value: bool) {
        if value {
            self.set(idx);
        } else {
            self.unset(idx);
        }
    }

    /// Toggles the bit at the given index.
    ///
    /// Returns the previous value of the bit (before the toggle).
    ///
    /// # Panics
    /// Panics if `idx >= self.nbits()`.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(8)?;
    /// assert_eq!(bitset.toggle(4), false); // flipped from false to true
    /// assert_eq!(bitset.toggle(4), true);  // flipped from true to false
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    #[inline]
    pub fn toggle(&mut self, idx: usize) -> bool {
        self.assert_in_bounds(idx);
        let (atom_idx, bit_idx) = Self::idxs(idx);
        let mask = Self::bit_mask(bit_idx);
        let bit = self.atoms[atom_idx] & mask != 0;
        self.atoms[atom_idx] ^= mask;
        bit
    }

    #[inline]
    fn idxs(idx: usize) -> (usize, usize) {
        (idx / BITS_PER_ATOM, idx % BITS_PER_ATOM)
    }

    #[inline]
    const fn bit_mask(bit_idx: usize) -> Atom {
        1 << bit_idx
    }

    #[inline]
    fn assert_in_bounds(&self, idx: usize) {
        assert!(idx < self.nbits, "Bit index {idx} out of bounds");
    }

    #[inline]
    fn assert_same_atom_count(&self, other: &Self) {
        assert_eq!(
            self.natoms(),
            other.natoms(),
            "Bitsets must have the same atom count."
        );
    }

    /// Returns the number of set bits.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(130)?;
    /// bitset.set(0);
    /// bitset.set(64);
    /// bitset.set(129);
    /// assert_eq!(bitset.popcount(), 3);
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    #[inline]
    pub fn popcount(&self) -> usize {
        let total: usize = self.atoms.iter().map(|a| a.count_ones() as usize).sum();
        debug_assert!(total <= self.nbits);
        total
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.iter().all(|a| *a == 0)
    }

    /// Returns the index of the first set bit or `None` if all bits are unset.
    ///
    /// Runs in O(a) where a is the atom count.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(200)?;
    /// assert_eq!(bitset.first_set(), None);
    /// bitset.set(150);
    /// assert_eq!(bitset.first_set(), Some(150));
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    pub fn first_set(&self) -> Option<usize> {
        Self::scan_from_atom(&self.atoms, 0)
    }

    /// Returns the smallest set index that is `>= from`, or `None` if there
    /// is none.
    ///
    /// `from` may be at or past the capacity, in which case `None` is
    /// returned. Walking all set bits with this is O(k * a), so prefer set
    /// algebra where possible.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut bitset = BitSet::new(10)?;
    /// bitset.set(3);
    /// bitset.set(7);
    /// assert_eq!(bitset.next_set(3), Some(3));
    /// assert_eq!(bitset.next_set(4), Some(7));
    /// assert_eq!(bitset.next_set(8), None);
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    pub fn next_set(&self, from: usize) -> Option<usize> {
        if from >= self.nbits {
            return None;
        }
        let (atom_idx, bit_idx) = Self::idxs(from);

        // look in the atom holding `from`, ignoring bits below it
        let masked = self.atoms[atom_idx] & (Atom::MAX << bit_idx);
        if masked != 0 {
            return Some(atom_idx * BITS_PER_ATOM + masked.trailing_zeros() as usize);
        }

        Self::scan_from_atom(&self.atoms, atom_idx + 1)
    }

    fn scan_from_atom(atoms: &[Atom], start: usize) -> Option<usize> {
        for (i, atom) in atoms.iter().enumerate().skip(start) {
            if *atom != 0 {
                let bit = atom.trailing_zeros() as usize;
                return Some(i * BITS_PER_ATOM + bit);
            }
        }
        None
    }

    /// Stores the intersection of `a` and `b` into `self`.
    ///
    /// # Panics
    /// Panics if the three bitsets don't share the same atom count.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut a = BitSet::new(4)?;
    /// a.set(0);
    /// a.set(2);
    /// let mut b = BitSet::new(4)?;
    /// b.set(2);
    /// b.set(3);
    /// let mut dest = BitSet::new(4)?;
    /// dest.intersection_of(&a, &b);
    /// assert_eq!(dest.first_set(), Some(2));
    /// assert_eq!(dest.popcount(), 1);
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    pub fn intersection_of(&mut self, a: &Self, b: &Self) {
        self.combine_from(a, b, |x, y| x & y);
    }

    /// Stores the union of `a` and `b` into `self`.
    ///
    /// # Panics
    /// Panics if the three bitsets don't share the same atom count.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut a = BitSet::new(4)?;
    /// a.set(0);
    /// let mut b = BitSet::new(4)?;
    /// b.set(3);
    /// let mut dest = BitSet::new(4)?;
    /// dest.union_of(&a, &b);
    /// assert!(dest.get(0) && dest.get(3));
    /// assert_eq!(dest.popcount(), 2);
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    pub fn union_of(&mut self, a: &Self, b: &Self) {
        self.combine_from(a, b, |x, y| x | y);
    }

    #[inline]
    fn combine_from(&mut self, a: &Self, b: &Self, op: impl Fn(Atom, Atom) -> Atom) {
        a.assert_same_atom_count(b);
        self.assert_same_atom_count(a);
        for ((dest, x), y) in self.atoms.iter_mut().zip(&a.atoms).zip(&b.atoms) {
            *dest = op(*x, *y);
        }
        self.clear_padding();
    }

    /// Performs an in-place intersection with another bitset.
    ///
    /// Each bit in `self` is updated to the result of `self & other`.
    ///
    /// # Panics
    /// Panics if `self.natoms() != other.natoms()`.
    #[inline]
    pub fn intersect_with(&mut self, other: &Self) {
        self.assert_same_atom_count(other);
        for (self_atom, other_atom) in self.atoms.iter_mut().zip(&other.atoms) {
            *self_atom &= other_atom
        }
    }

    /// Performs an in-place union with another bitset.
    ///
    /// Each bit in `self` is updated to the result of `self | other`.
    /// Bits of `other` at or beyond `self.nbits()` are dropped.
    ///
    /// # Panics
    /// Panics if `self.natoms() != other.natoms()`.
    ///
    /// # Examples
    /// ```
    /// use dense_bitset::BitSet;
    ///
    /// let mut a = BitSet::new(65)?;
    /// a.set(0);
    /// let mut b = BitSet::new(65)?;
    /// b.set(64);
    /// a.union_with(&b);
    /// assert_eq!(a.popcount(), 2);
    /// # Ok::<(), dense_bitset::Error>(())
    /// ```
    #[inline]
    pub fn union_with(&mut self, other: &Self) {
        self.assert_same_atom_count(other);
        for (self_atom, other_atom) in self.atoms.iter_mut().zip(&other.atoms) {
            *self_atom |= other_atom
        }
        self.clear_padding();
    }

    #[inline]
    fn clear_padding(&mut self) {
        let bits_in_last = self.nbits % BITS_PER_ATOM;
        if bits_in_last != 0 {
            if let Some(last) = self.atoms.last_mut() {
                *last &= (1 << bits_in_last) - 1;
            }
        }
    }
}

impl Default for BitSet {
    /// An empty bitset with zero capacity. Does not allocate.
    fn default() -> Self {
        Self {
            nbits: 0,
            atoms: Vec::new(),
        }
    }
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "LSB -> ")?;
        for i in 0..self.nbits {
            if i % 8 == 0 {
                write!(f, "{i}: ")?;
            }
            write!(f, "{}", if self.get(i) { '1' } else { '0' })?;
            if i % 8 == 7 && i < self.nbits - 1 {
                write!(f, " ")?;
            }
        }
        write!(f, " <- MSB")?;
        Ok(())
    }
}

impl BitAnd for &BitSet {
    type Output = BitSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        let mut out = self.clone();
        out.intersect_with(rhs);
        out
    }
}

impl BitAndAssign<&BitSet> for BitSet {
    fn bitand_assign(&mut self, rhs: &BitSet) {
        self.intersect_with(rhs)
    }
}

impl BitOr for &BitSet {
    type Output = BitSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        let mut out = self.clone();
        out.union_with(rhs);
        out
    }
}

impl BitOrAssign<&BitSet> for BitSet {
    fn bitor_assign(&mut self, rhs: &BitSet) {
        self.union_with(rhs)
    }
}
