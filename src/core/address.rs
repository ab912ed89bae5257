//! Address and word types for the IntCode machine.
//!
//! These are separated out to break circular dependencies between core modules.

/// A memory cell value (64-bit signed).
pub type Word = i64;

/// An effective memory address. Addresses are never negative.
pub type Address = u64;

/// How far past the end of the dense region a write may land and still
/// extend it. Writes further out go to sparse storage.
pub const DENSE_SLACK: u64 = 4096;

/// Convert a word into an address, if it is non-negative.
#[inline]
pub fn to_address(word: Word) -> Option<Address> {
    Address::try_from(word).ok()
}
