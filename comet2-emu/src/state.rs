//! Renders the `du`/`df`/`-d` memory dumps and the `last_state.txt` file
//! written at halt, matching `pycomet2.py`'s own persisted-state format.

use comet2::Machine;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write as _};
use std::path::Path;

/// Formats `count` words starting at `address` as one hex+ASCII row per 8
/// words, the same layout the `du`/`st` debugger commands use for a page at
/// a time.
pub fn format_memory_rows(machine: &Machine, address: u16, count: u32) -> String {
    let mut out = String::new();
    let mut addr = address as u32;
    let mut remaining = count;
    while remaining > 0 {
        let row_len = remaining.min(8);
        let words = machine.memory.slice(addr, row_len);
        write_row(&mut out, addr as u16, &words);
        addr = addr.wrapping_add(row_len);
        remaining -= row_len;
    }
    out
}

fn write_row(out: &mut String, addr: u16, words: &[u16]) {
    let hex: Vec<String> = words.iter().map(|w| format!("{:04x}", w)).collect();
    let ascii: String = words
        .iter()
        .map(|&w| {
            let byte = (w & 0xff) as u8;
            if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '.'
            }
        })
        .collect();
    let _ = writeln!(out, "#{:04x}  {:<39}  {}", addr, hex.join(" "), ascii);
}

/// Writes a full 65536-word memory dump to `path`, for the `df` command.
pub fn dump_memory_to_file(machine: &Machine, path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(format_memory_rows(machine, 0, 0x10000).as_bytes())
}

/// Writes `last_state.txt` next to the current directory, matching `-d`'s
/// format: step count, `PR`/`SP`/flags/`GR0..GR7`, then the full memory dump.
pub fn write_last_state(machine: &Machine, path: impl AsRef<Path>) -> io::Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "Step count: {}", machine.step_count);
    let _ = writeln!(out, "PR: #{:04x}", machine.pr);
    let _ = writeln!(out, "SP: #{:04x}", machine.registers.sp());
    let _ = writeln!(out, "OF: {}", machine.flags.of as u8);
    let _ = writeln!(out, "SF: {}", machine.flags.sf as u8);
    let _ = writeln!(out, "ZF: {}", machine.flags.zf as u8);
    for (i, id) in comet2::RegisterId::GENERAL.iter().enumerate() {
        let _ = writeln!(out, "GR{}: #{:04x}", i, machine.gr(*id));
    }
    let _ = writeln!(out, "Memory:");
    out.push_str(&format_memory_rows(machine, 0, 0x10000));

    File::create(path)?.write_all(out.as_bytes())
}
