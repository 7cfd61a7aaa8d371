//! Descriptor Set Module
//!
//! Provides a fixed-capacity bitmask over descriptor indices, the Rust
//! counterpart of the `fd_set` structure and its `FD_*` macros.
//!
//! Bit *i* set means descriptor *i* is of interest (on input) or ready (on
//! output) for the role the set is used for. The set never grows; indices at
//! or above [`FD_SETSIZE`] are out of range.

use std::ffi::c_ulong;

/// Number of descriptor indices a set can hold
pub const FD_SETSIZE: usize = 1024;

/// Number of bits per storage word
///
/// Words are C `unsigned long`: 32 bits on Windows, 64 on LP64 Unix.
pub const NFDBITS: usize = c_ulong::BITS as usize;

const WORDS: usize = FD_SETSIZE.div_ceil(NFDBITS);

#[inline]
fn word(fd: usize) -> usize {
    assert!(fd < FD_SETSIZE, "descriptor {} out of range (FD_SETSIZE = {})", fd, FD_SETSIZE);
    fd / NFDBITS
}

#[inline]
fn mask(fd: usize) -> c_ulong {
    1 << (fd % NFDBITS)
}

/// Descriptor bitmask
///
/// Equivalent to C's `fd_set` (`unsigned long fds_bits[FD_SETSIZE / NFDBITS]`).
/// Size and alignment follow the C struct on every target, so the facade
/// layer can reinterpret a caller's pointer in place.
#[repr(C)]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DescriptorSet {
    bits: [c_ulong; WORDS],
}

impl DescriptorSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Clear every bit
    ///
    /// Equivalent to C's `FD_ZERO`.
    pub fn zero(&mut self) {
        self.bits = [0; WORDS];
    }

    /// Mark descriptor `fd` as a member
    ///
    /// Equivalent to C's `FD_SET`.
    ///
    /// # Panics
    ///
    /// Panics if `fd >= FD_SETSIZE`.
    pub fn set(&mut self, fd: usize) {
        self.bits[word(fd)] |= mask(fd);
    }

    /// Remove descriptor `fd`
    ///
    /// Equivalent to C's `FD_CLR`.
    ///
    /// # Panics
    ///
    /// Panics if `fd >= FD_SETSIZE`.
    pub fn clear(&mut self, fd: usize) {
        self.bits[word(fd)] &= !mask(fd);
    }

    /// Test whether descriptor `fd` is a member
    ///
    /// Equivalent to C's `FD_ISSET`.
    ///
    /// # Panics
    ///
    /// Panics if `fd >= FD_SETSIZE`.
    pub fn is_set(&self, fd: usize) -> bool {
        self.bits[word(fd)] & mask(fd) != 0
    }

    /// Overwrite this set with the contents of `other`
    ///
    /// Equivalent to C's `FD_COPY(other, self)`.
    pub fn copy_from(&mut self, other: &DescriptorSet) {
        self.bits = other.bits;
    }

    /// Number of members
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether the set has no members
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Iterate over member descriptors in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().flat_map(|(i, &w)| {
            let base = i * NFDBITS;
            (0..NFDBITS).filter(move |b| w & (1 << b) != 0).map(move |b| base + b)
        })
    }
}

impl Default for DescriptorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DescriptorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<usize> for DescriptorSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = DescriptorSet::new();
        for fd in iter {
            set.set(fd);
        }
        set
    }
}
