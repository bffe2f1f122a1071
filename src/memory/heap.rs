//! Heap simulator
//!
//! Dynamic memory is a set of disjoint, word-granular blocks handed out by a
//! bump allocator. Every read and write is validated against the live
//! blocks; an address is valid iff it falls in `[base, base + span)` of some
//! allocated block, exclusive at the end. Local arrays live here too, under
//! the same validity checks as `MALLOC`-ed memory; there is no second,
//! unchecked storage path.
//!
//! The heap is intentionally coarse: blocks store whole words ([`Value`]
//! cells) and nothing is type-checked on store. Validity lookup is a linear
//! scan of live blocks, which is fine at the program sizes this evaluator
//! is meant for.

use super::value::{Address, Value};
use crate::interpreter::constants::{HEAP_ADDRESS_START, WORD_SIZE};
use crate::interpreter::errors::Diagnostic;
use rustc_hash::FxHashMap;

/// A live block: `size_words` zero-initialized word cells
#[derive(Debug, Clone)]
pub struct HeapBlock {
    cells: Vec<Value>,
}

impl HeapBlock {
    fn new(size_words: usize) -> Self {
        HeapBlock {
            cells: vec![Value::Int(0); size_words],
        }
    }

    /// Address span of the block in bytes
    fn span(&self) -> u64 {
        self.cells.len() as u64 * WORD_SIZE
    }
}

/// The simulated heap
#[derive(Debug, Clone, Default)]
pub struct Heap {
    blocks: FxHashMap<Address, HeapBlock>,
    next_address: Address,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            blocks: FxHashMap::default(),
            next_address: HEAP_ADDRESS_START,
        }
    }

    /// Reserve a fresh block of `size_words` words and return its base
    /// address. Allocation never fails; there is no simulated out-of-memory.
    pub fn allocate(&mut self, size_words: usize) -> Address {
        let base = self.next_address;
        self.next_address += (size_words.max(1) as u64) * WORD_SIZE;
        self.blocks.insert(base, HeapBlock::new(size_words));
        tracing::trace!(base, size_words, "heap allocate");
        base
    }

    /// Release the block containing `addr` (base or interior address)
    pub fn free(&mut self, addr: Address) -> Result<(), Diagnostic> {
        // Exact-base match first: a zero-size block has an empty span, so
        // the range scan cannot find it
        let base = if self.blocks.contains_key(&addr) {
            addr
        } else {
            self.base_of(addr).ok_or(Diagnostic::InvalidFree { addr })?
        };
        self.blocks.remove(&base);
        tracing::trace!(base, "heap free");
        Ok(())
    }

    /// Read the word at `addr`
    pub fn read(&self, addr: Address) -> Result<Value, Diagnostic> {
        let (base, block) = self
            .block_containing(addr)
            .ok_or(Diagnostic::InvalidMemoryAccess { addr })?;
        let slot = ((addr - base) / WORD_SIZE) as usize;
        Ok(block.cells[slot])
    }

    /// Store `value` in the word at `addr`
    pub fn write(&mut self, addr: Address, value: Value) -> Result<(), Diagnostic> {
        let base = self
            .base_of(addr)
            .ok_or(Diagnostic::InvalidMemoryAccess { addr })?;
        let slot = ((addr - base) / WORD_SIZE) as usize;
        if let Some(block) = self.blocks.get_mut(&base) {
            block.cells[slot] = value;
        }
        Ok(())
    }

    /// Whether `addr` is currently valid for read/write
    pub fn is_valid(&self, addr: Address) -> bool {
        self.block_containing(addr).is_some()
    }

    /// Number of live blocks
    pub fn live_blocks(&self) -> usize {
        self.blocks.len()
    }

    fn block_containing(&self, addr: Address) -> Option<(Address, &HeapBlock)> {
        self.blocks
            .iter()
            .find(|(&base, block)| addr >= base && addr < base + block.span())
            .map(|(&base, block)| (base, block))
    }

    fn base_of(&self, addr: Address) -> Option<Address> {
        self.block_containing(addr).map(|(base, _)| base)
    }
}
