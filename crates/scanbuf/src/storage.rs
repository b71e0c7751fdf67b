//! Backing memory for a [`Buffer`](crate::Buffer).
//!
//! A buffer either owns a growable `Vec<u8>` or borrows memory from the
//! caller. Borrowed memory is never freed by the buffer; it can be traded for
//! owned memory with [`Storage::convert_to_growable`].

use alloc::{vec, vec::Vec};

/// Smallest allocation made when growing geometrically from empty.
const MIN_GEOMETRIC_ALLOCATION: usize = 64;

#[derive(Debug)]
enum Memory<'a> {
    Owned(Vec<u8>),
    External(&'a mut [u8]),
    ReadOnly(&'a [u8]),
}

#[derive(Debug)]
pub(crate) struct Storage<'a> {
    memory: Memory<'a>,
    /// Linear growth step; zero selects geometric growth.
    grow_size: usize,
}

impl<'a> Storage<'a> {
    pub(crate) fn new(grow_size: usize, init_size: usize) -> Self {
        Self {
            memory: Memory::Owned(vec![0; init_size]),
            grow_size,
        }
    }

    pub(crate) fn external(memory: &'a mut [u8]) -> Self {
        Self {
            memory: Memory::External(memory),
            grow_size: 0,
        }
    }

    pub(crate) fn read_only(memory: &'a [u8]) -> Self {
        Self {
            memory: Memory::ReadOnly(memory),
            grow_size: 0,
        }
    }

    pub(crate) fn assume(memory: Vec<u8>) -> Self {
        Self {
            memory: Memory::Owned(memory),
            grow_size: 0,
        }
    }

    pub(crate) fn num_allocated(&self) -> usize {
        self.as_slice().len()
    }

    pub(crate) fn is_externally_allocated(&self) -> bool {
        !matches!(self.memory, Memory::Owned(_))
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        match &self.memory {
            Memory::Owned(v) => v,
            Memory::External(m) => m,
            Memory::ReadOnly(m) => m,
        }
    }

    /// `None` for read-only views.
    pub(crate) fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match &mut self.memory {
            Memory::Owned(v) => Some(v),
            Memory::External(m) => Some(m),
            Memory::ReadOnly(_) => None,
        }
    }

    /// Grows owned memory to at least `n` bytes. External memory is left as
    /// is.
    pub(crate) fn ensure_capacity(&mut self, n: usize) {
        if let Memory::Owned(v) = &mut self.memory {
            if v.len() < n {
                v.resize(n, 0);
            }
        }
    }

    /// Grows owned memory by one step. External memory cannot grow.
    pub(crate) fn grow(&mut self) {
        let grow_size = self.grow_size;
        if let Memory::Owned(v) = &mut self.memory {
            let next = if grow_size > 0 {
                v.len() + grow_size
            } else {
                (v.len() * 2).max(MIN_GEOMETRIC_ALLOCATION)
            };
            tracing::debug!(from = v.len(), to = next, "growing buffer storage");
            v.resize(next, 0);
        }
    }

    /// Replaces external memory with an owned copy of at least `min_size`
    /// bytes.
    pub(crate) fn convert_to_growable(&mut self, min_size: usize) {
        let mut copy = match &self.memory {
            Memory::Owned(_) => return,
            Memory::External(m) => m.to_vec(),
            Memory::ReadOnly(m) => m.to_vec(),
        };
        if copy.len() < min_size {
            copy.resize(min_size, 0);
        }
        self.memory = Memory::Owned(copy);
    }

    /// Hands owned memory to the caller, leaving this storage empty. External
    /// memory belongs to the caller already and yields `None`.
    pub(crate) fn detach(&mut self) -> Option<Vec<u8>> {
        match &mut self.memory {
            Memory::Owned(v) => Some(core::mem::take(v)),
            Memory::External(_) | Memory::ReadOnly(_) => None,
        }
    }

    /// Releases the memory. The storage becomes empty and owned.
    pub(crate) fn purge(&mut self) {
        self.memory = Memory::Owned(Vec::new());
    }
}
