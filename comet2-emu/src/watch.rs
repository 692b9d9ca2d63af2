//! `-w` watch mode: single-steps the machine, printing one formatted status
//! line per step, until a breakpoint fires or the machine stops.

use crate::repl;
use comet2::debugger::monitor::{self, WatchItem};
use comet2::{Debugger, Io, Machine, RunResult};

pub fn parse_items(spec: &str) -> Result<Vec<WatchItem>, String> {
    spec.split(',').map(str::trim).filter(|s| !s.is_empty()).map(monitor::parse).collect()
}

pub fn run(
    machine: &mut Machine,
    debugger: &mut Debugger,
    io: &mut dyn Io,
    items: &[WatchItem],
    decimal: bool,
    print_count: bool,
    dump_state: bool,
) {
    loop {
        if debugger.breakpoints().contains(&machine.pr) {
            repl::report(machine, RunResult::Breakpoint(machine.pr), print_count, dump_state);
            return;
        }

        let result = debugger.step(machine, io);
        let line: Vec<String> = items.iter().map(|&item| monitor::format(item, machine, decimal)).collect();
        eprintln!("{}", line.join("  "));

        match result {
            RunResult::StepLimitReached => {}
            other => {
                repl::report(machine, other, print_count, dump_state);
                return;
            }
        }
    }
}
