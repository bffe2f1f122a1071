// Constants for the evaluator

/// Size of the machine word, in bytes. Integers, characters, pointers, and
/// heap addresses are all one word wide; `sizeof` always yields this.
pub const WORD_SIZE: u64 = 8;

/// Starting address for heap allocations.
/// Heap addresses start high so they are clearly distinct from null.
pub const HEAP_ADDRESS_START: u64 = 0x1000_0000;

/// Sentinel substituted for the result of a failed read or unsupported
/// operation, so evaluation can continue after reporting.
pub const SENTINEL: i64 = -1;

/// Function names matched once during initialization to tag each
/// declaration's role for the whole run.
pub const ENTRY_NAME: &str = "main";
pub const INPUT_NAME: &str = "GET";
pub const OUTPUT_NAME: &str = "PRINT";
pub const ALLOC_NAME: &str = "MALLOC";
pub const FREE_NAME: &str = "FREE";
