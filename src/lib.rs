//! The COMET II machine: registers, memory, the opcode table, fetch/decode/execute,
//! a disassembler, and the breakpoint/run mechanics behind the interactive debugger.
//!
//! `comet2-object` builds object files on top of this crate's `Machine`; `casl2`
//! shares its `Opcode`/`RegisterId` tables when encoding assembly; `comet2-emu`
//! drives the `Debugger` from a terminal front-end.

pub mod constants;
pub mod debugger;
pub mod disassembler;
pub mod flags;
pub mod io;
pub mod memory;
pub mod processor;
pub mod register;

pub use debugger::{Debugger, RunResult};
pub use disassembler::{disassemble, disassemble_range, Disassembled};
pub use flags::Flags;
pub use io::{BufferIo, Io, StdIo};
pub use memory::Memory;
pub use processor::{step, ArgType, Machine, Opcode, StepOutcome};
pub use register::{RegisterId, Registers};
pub use util::{EnumFromStr, ParseEnumError};

/// One COMET II machine word. All registers, memory cells and instruction
/// operands are this width.
pub type Word = u16;
