//! Bit layout of a packed COMET II instruction word and other machine constants.

/// Every COMET II memory cell, register and instruction word is 16 bits wide.
pub const WORD_WIDTH: u32 = 16;

/// Number of addressable words in main memory (COMET II has a 16-bit address space).
pub const MEMORY_SIZE: usize = 1 << WORD_WIDTH;

/// `SP` (`GR8`) is initialized to this address on power-up, matching the reference
/// machine's high-memory stack convention.
pub const INITIAL_SP: u16 = 0xff00;

/// Maximum length of a string read by `IN` / written by `OUT`.
pub const MAX_STRLEN: usize = 256;

/// First word of an instruction is always laid out as `OPCODE(8) : R1(4) : R2_OR_X(4)`.
pub const OPCODE_OFFSET: u32 = 8;
pub const OPCODE_MASK: u16 = 0xff00;
pub const R1_OFFSET: u32 = 4;
pub const R1_MASK: u16 = 0x00f0;
pub const R2_OFFSET: u32 = 0;
pub const R2_MASK: u16 = 0x000f;

/// Object file header: `'C' 'A'`, `'S' 'L'`, followed by the entry address and five
/// reserved words, for eight header words total before the program image begins.
pub const OBJECT_MAGIC: [u16; 2] = [0x4341, 0x534c];
pub const OBJECT_HEADER_WORDS: usize = 8;
