//! Memory type for the IntCode virtual machine.
//!
//! Memory is semantically infinite: every non-negative address is a valid
//! read or write target and cells that were never written read as zero.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use super::address::{Address, Word, DENSE_SLACK};

/// Sparse, unbounded memory.
///
/// The program image and anything written close to it live in a contiguous
/// vector. Writes far beyond its end go to a hash map instead, so a program
/// that pokes address 10^12 does not allocate terabytes.
///
/// Equality compares contents only: two memories holding the same non-zero
/// cells are equal regardless of which storage holds them.
#[derive(Clone, Default)]
pub struct Memory {
    dense: Vec<Word>,
    sparse: HashMap<Address, Word>,
}

impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.non_zero_cells() == other.non_zero_cells()
    }
}

impl Eq for Memory {}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show non-zero cells
        let nonzero = self.non_zero_cells();

        if nonzero.is_empty() {
            write!(f, "Memory{{all zero}}")
        } else {
            write!(f, "Memory{{")?;
            for (i, (addr, val)) in nonzero.iter().enumerate() {
                if i > 0 { write!(f, ", ")?; }
                write!(f, "[{}]={}", addr, val)?;
            }
            write!(f, "}}")
        }
    }
}

impl Memory {
    /// Create an empty memory: every cell reads zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory seeded with `image` at addresses `0..image.len()`.
    pub fn from_image(image: &[Word]) -> Self {
        Self {
            dense: image.to_vec(),
            sparse: HashMap::new(),
        }
    }

    /// Read the value at the given address (zero if never written).
    #[inline]
    pub fn read(&self, addr: Address) -> Word {
        match usize::try_from(addr) {
            Ok(idx) if idx < self.dense.len() => self.dense[idx],
            _ => self.sparse.get(&addr).copied().unwrap_or(0),
        }
    }

    /// Write a value to the given address, extending memory as needed.
    pub fn write(&mut self, addr: Address, value: Word) {
        let len = self.dense.len() as u64;

        if addr < len {
            self.dense[addr as usize] = value;
        } else if addr - len < DENSE_SLACK {
            self.grow_dense(addr as usize + 1);
            self.dense[addr as usize] = value;
        } else if value == 0 {
            self.sparse.remove(&addr);
        } else {
            self.sparse.insert(addr, value);
        }
    }

    /// Extend the dense region to `new_len` cells, pulling in any sparse
    /// cells it now covers.
    fn grow_dense(&mut self, new_len: usize) {
        let old_len = self.dense.len();
        self.dense.resize(new_len, 0);

        if self.sparse.is_empty() {
            return;
        }
        let covered = old_len as u64..new_len as u64;
        let moved: Vec<Address> = self.sparse.keys()
            .filter(|addr| covered.contains(addr))
            .copied()
            .collect();
        for addr in moved {
            if let Some(v) = self.sparse.remove(&addr) {
                self.dense[addr as usize] = v;
            }
        }
    }

    /// Copy out a contiguous range of cells.
    pub fn snapshot(&self, range: Range<Address>) -> Vec<Word> {
        range.map(|addr| self.read(addr)).collect()
    }

    /// All non-zero cells, ordered by address.
    pub fn non_zero_cells(&self) -> Vec<(Address, Word)> {
        let mut cells: Vec<(Address, Word)> = self.dense.iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(i, v)| (i as Address, *v))
            .collect();

        let mut far: Vec<(Address, Word)> = self.sparse.iter()
            .filter(|(_, v)| **v != 0)
            .map(|(a, v)| (*a, *v))
            .collect();
        far.sort_unstable_by_key(|(a, _)| *a);

        cells.extend(far);
        cells
    }

    /// One past the highest address ever written or seeded.
    ///
    /// Saturates at `u64::MAX`: a cell at the very last address reports the
    /// same extent as one just below it.
    pub fn extent(&self) -> Address {
        let dense_end = self.dense.len() as Address;
        self.sparse.keys()
            .map(|a| a.saturating_add(1))
            .max()
            .map_or(dense_end, |far_end| far_end.max(dense_end))
    }

    /// Number of cells held in the contiguous region.
    pub fn dense_len(&self) -> usize {
        self.dense.len()
    }

    /// Number of cells held in sparse storage.
    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    /// Check if every cell reads zero.
    pub fn is_empty(&self) -> bool {
        self.dense.iter().all(|v| *v == 0) && self.sparse.values().all(|v| *v == 0)
    }
}
