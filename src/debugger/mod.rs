//! Breakpoint management and the run/step mechanics behind the interactive
//! debugger. Command parsing and line I/O live in `comet2-emu`; this module
//! only knows how to advance a `Machine` and report where it stopped.

pub mod monitor;

use crate::io::Io;
use crate::processor::{step, Machine, StepOutcome};

/// Why a debugger `run`/`step` call returned control to its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunResult {
    /// A breakpoint at this address was hit before the instruction executed.
    Breakpoint(u16),
    /// `RET` executed with no outstanding `CALL` on the call stack.
    Halted,
    /// The word at the given address does not decode to a known opcode.
    InvalidOpcode(u16),
    /// `step`/`run` performed the requested number of steps without stopping.
    StepLimitReached,
}

/// Tracks breakpoints and drives execution of a `Machine`.
#[derive(Default)]
pub struct Debugger {
    breakpoints: Vec<u16>,
}

impl Debugger {
    pub fn new() -> Debugger {
        Debugger {
            breakpoints: Vec::new(),
        }
    }

    pub fn breakpoints(&self) -> &[u16] {
        &self.breakpoints[..]
    }

    /// Adds a breakpoint. Returns `false` (and leaves the list unchanged) if
    /// `addr` is already set, matching the reference tool's duplicate warning.
    pub fn add_breakpoint(&mut self, addr: u16) -> bool {
        if self.breakpoints.contains(&addr) {
            false
        } else {
            self.breakpoints.push(addr);
            true
        }
    }

    /// Removes the breakpoint at list position `index`, returning its address.
    pub fn remove_breakpoint(&mut self, index: usize) -> Option<u16> {
        if index < self.breakpoints.len() {
            Some(self.breakpoints.remove(index))
        } else {
            None
        }
    }

    /// Executes exactly one instruction.
    pub fn step(&mut self, machine: &mut Machine, io: &mut dyn Io) -> RunResult {
        match step(machine, io) {
            StepOutcome::Halt => RunResult::Halted,
            StepOutcome::InvalidOpcode(word) => RunResult::InvalidOpcode(word),
            StepOutcome::Continue | StepOutcome::Jumped(_) => RunResult::StepLimitReached,
        }
    }

    /// Runs until a breakpoint, halt or invalid opcode is encountered.
    pub fn run(&mut self, machine: &mut Machine, io: &mut dyn Io) -> RunResult {
        loop {
            if self.breakpoints.contains(&machine.pr) {
                return RunResult::Breakpoint(machine.pr);
            }
            match step(machine, io) {
                StepOutcome::Halt => return RunResult::Halted,
                StepOutcome::InvalidOpcode(word) => return RunResult::InvalidOpcode(word),
                StepOutcome::Continue | StepOutcome::Jumped(_) => {}
            }
        }
    }

    /// Sets `PR` directly, as the `j` command does.
    pub fn jump(&self, machine: &mut Machine, addr: u16) {
        machine.pr = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufferIo;
    use crate::processor::{encode_first_word, Opcode};

    #[test]
    fn run_stops_at_breakpoint_before_executing_it() {
        let mut machine = Machine::new();
        machine.memory.load_image(&[
            encode_first_word(Opcode::Nop as u8, 0, 0),
            encode_first_word(Opcode::Nop as u8, 0, 0),
            encode_first_word(Opcode::Ret as u8, 0, 0),
        ]);
        let mut debugger = Debugger::new();
        debugger.add_breakpoint(2);
        let mut io = BufferIo::default();
        assert_eq!(debugger.run(&mut machine, &mut io), RunResult::Breakpoint(2));
        assert_eq!(machine.pr, 2);
    }

    #[test]
    fn duplicate_breakpoint_is_rejected() {
        let mut debugger = Debugger::new();
        assert!(debugger.add_breakpoint(4));
        assert!(!debugger.add_breakpoint(4));
    }
}
