//! The interactive debugger REPL: reads one command per line from stdin,
//! dispatches it against a `Machine`/`Debugger` pair, and prints status to
//! stderr, matching `pycomet2.py`'s `pycomet2> ` session.

use crate::state;
use comet2::{disassemble, disassemble_range, Debugger, Io, Machine, RegisterId, RunResult};
use std::io::BufRead;

const HELP: &str = "\
b ADDR        add a breakpoint
d N           remove breakpoint number N
di [ADDR]     disassemble 16 instructions from ADDR (default PR)
du [ADDR]     dump 16 rows of memory from ADDR (default 0)
df FILE       dump all of memory to FILE
h             this help
i             list breakpoints
j ADDR        set PR and print status
m ADDR VAL    write VAL to mem[ADDR]
p             print status
r             run until breakpoint or halt
s             single-step and print status
st            dump 16 rows of memory from SP
q             quit";

/// Runs the interactive REPL until `q` or end-of-file on stdin.
pub fn run(machine: &mut Machine, debugger: &mut Debugger, io: &mut dyn Io, decimal: bool, print_count: bool, dump_state: bool) {
    let stdin = std::io::stdin();
    loop {
        eprint!("pycomet2> ");
        use std::io::Write;
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let command = tokens.next().unwrap_or("");
        let args: Vec<&str> = tokens.collect();

        match command {
            "b" => dispatch_breakpoint(debugger, &args),
            "d" => dispatch_remove_breakpoint(debugger, &args),
            "di" => dispatch_disassemble(machine, &args),
            "du" => dispatch_dump(machine, &args, 0),
            "df" => dispatch_dump_file(machine, &args),
            "h" => eprintln!("{}", HELP),
            "i" => dispatch_list_breakpoints(debugger),
            "j" => dispatch_jump(machine, debugger, &args, decimal),
            "m" => dispatch_poke(machine, &args),
            "p" => print_status(machine, decimal),
            "r" => {
                if run_until_stop(machine, debugger, io, print_count, dump_state) {
                    break;
                }
            }
            "s" => {
                if single_step(machine, debugger, io, print_count, dump_state) {
                    break;
                }
            }
            "st" => {
                let sp = machine.registers.sp();
                eprint!("{}", state::format_memory_rows(machine, sp, 16 * 8));
            }
            "q" => break,
            other => eprintln!("unknown command \"{}\"; try \"h\" for help", other),
        }
    }
}

fn parse_addr(token: &str) -> Option<u16> {
    if let Some(hex) = token.strip_prefix('#') {
        u16::from_str_radix(hex, 16).ok()
    } else {
        token.parse::<i32>().ok().map(|v| (v & 0xffff) as u16)
    }
}

fn dispatch_breakpoint(debugger: &mut Debugger, args: &[&str]) {
    let addr = match args.first().and_then(|s| parse_addr(s)) {
        Some(a) => a,
        None => return eprintln!("usage: b ADDR"),
    };
    if !debugger.add_breakpoint(addr) {
        eprintln!("breakpoint already set at #{:04x}", addr);
    }
}

fn dispatch_remove_breakpoint(debugger: &mut Debugger, args: &[&str]) {
    let index = match args.first().and_then(|s| s.parse::<usize>().ok()) {
        Some(n) => n,
        None => return eprintln!("usage: d N"),
    };
    match debugger.remove_breakpoint(index) {
        Some(addr) => eprintln!("removed breakpoint at #{:04x}", addr),
        None => eprintln!("no breakpoint numbered {}", index),
    }
}

fn dispatch_list_breakpoints(debugger: &Debugger) {
    for (i, addr) in debugger.breakpoints().iter().enumerate() {
        eprintln!("{}: #{:04x}", i, addr);
    }
}

fn dispatch_disassemble(machine: &Machine, args: &[&str]) {
    let start = args.first().and_then(|s| parse_addr(s)).unwrap_or(machine.pr);
    for (addr, inst) in disassemble_range(&machine.memory, start, 16) {
        eprintln!("#{:04x}  {}", addr, inst.text);
    }
}

fn dispatch_dump(machine: &Machine, args: &[&str], default: u16) {
    let start = args.first().and_then(|s| parse_addr(s)).unwrap_or(default);
    eprint!("{}", state::format_memory_rows(machine, start, 16 * 8));
}

fn dispatch_dump_file(machine: &Machine, args: &[&str]) {
    let path = match args.first() {
        Some(p) => p,
        None => return eprintln!("usage: df FILE"),
    };
    if let Err(err) = state::dump_memory_to_file(machine, path) {
        eprintln!("writing \"{}\" failed: {}", path, err);
    }
}

fn dispatch_jump(machine: &mut Machine, debugger: &Debugger, args: &[&str], decimal: bool) {
    let addr = match args.first().and_then(|s| parse_addr(s)) {
        Some(a) => a,
        None => return eprintln!("usage: j ADDR"),
    };
    debugger.jump(machine, addr);
    print_status(machine, decimal);
}

fn dispatch_poke(machine: &mut Machine, args: &[&str]) {
    if args.len() != 2 {
        return eprintln!("usage: m ADDR VAL");
    }
    let addr = match parse_addr(args[0]) {
        Some(a) => a,
        None => return eprintln!("invalid address \"{}\"", args[0]),
    };
    let val = match parse_addr(args[1]) {
        Some(v) => v,
        None => return eprintln!("invalid value \"{}\"", args[1]),
    };
    machine.memory.write(addr as u32, val);
}

fn print_status(machine: &Machine, decimal: bool) {
    let inst = disassemble(&machine.memory, machine.pr);
    eprintln!("PR  #{:04x}  {}", machine.pr, inst.text);
    for id in RegisterId::GENERAL.iter() {
        let value = machine.gr(*id);
        if decimal {
            eprint!("GR{}=#{} ", id.index(), value);
        } else {
            eprint!("GR{}=#{:04x} ", id.index(), value);
        }
    }
    eprintln!("SP=#{:04x}", machine.registers.sp());
    eprintln!(
        "FR={:03b} (OF={} SF={} ZF={})",
        machine.flags.packed(),
        machine.flags.of as u8,
        machine.flags.sf as u8,
        machine.flags.zf as u8
    );
}

/// Reports a `RunResult` to stderr.
pub(crate) fn report(machine: &Machine, result: RunResult, print_count: bool, dump_state: bool) {
    match result {
        RunResult::Breakpoint(addr) => eprintln!("breakpoint hit at #{:04x}", addr),
        RunResult::Halted => {
            eprintln!("program halted");
            on_halt(machine, print_count, dump_state);
        }
        RunResult::InvalidOpcode(_) => {
            eprintln!("Invalid operation is found at #{:04x}.", machine.pr);
            eprint!("{}", state::format_memory_rows(machine, machine.pr.saturating_sub(4), 8));
        }
        RunResult::StepLimitReached => {}
    }
}

fn on_halt(machine: &Machine, print_count: bool, dump_state: bool) {
    if print_count {
        eprintln!("Step count: {}", machine.step_count);
    }
    if dump_state {
        if let Err(err) = state::write_last_state(machine, "last_state.txt") {
            eprintln!("writing \"last_state.txt\" failed: {}", err);
        }
    }
}

fn run_until_stop(machine: &mut Machine, debugger: &mut Debugger, io: &mut dyn Io, print_count: bool, dump_state: bool) -> bool {
    let result = debugger.run(machine, io);
    report(machine, result, print_count, dump_state);
    matches!(result, RunResult::Halted)
}

fn single_step(machine: &mut Machine, debugger: &mut Debugger, io: &mut dyn Io, print_count: bool, dump_state: bool) -> bool {
    let result = debugger.step(machine, io);
    let halted = matches!(result, RunResult::Halted);
    if !matches!(result, RunResult::StepLimitReached) {
        report(machine, result, print_count, dump_state);
    } else {
        print_status(machine, false);
    }
    halted
}

