//! Watch expressions for the debugger's `-w` flag: `PR`, `OF`, `SF`, `ZF`,
//! `GRn` or a bare address, rendered as one line per `step`/`run`.

use crate::processor::Machine;
use crate::register::RegisterId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchItem {
    Pr,
    Of,
    Sf,
    Zf,
    Gr(u8),
    Mem(u16),
}

/// Parses one `-w` token. Accepts `PR`, `OF`, `SF`, `ZF`, `GR0`..`GR8`, or a
/// CASL II integer literal (`#hex`, plain decimal) naming a memory address.
pub fn parse(token: &str) -> Result<WatchItem, String> {
    match token {
        "PR" => Ok(WatchItem::Pr),
        "OF" => Ok(WatchItem::Of),
        "SF" => Ok(WatchItem::Sf),
        "ZF" => Ok(WatchItem::Zf),
        _ if token.starts_with("GR") => {
            let reg: u8 = token[2..]
                .parse()
                .map_err(|_| format!("invalid register name: {}", token))?;
            if reg > 8 {
                return Err(format!("invalid register name: {}", token));
            }
            Ok(WatchItem::Gr(reg))
        }
        _ => {
            let adr = parse_int(token).ok_or_else(|| format!("invalid monitor target: {}", token))?;
            if adr > 0xffff {
                return Err(format!("invalid monitor target: {}", token));
            }
            Ok(WatchItem::Mem(adr as u16))
        }
    }
}

fn parse_int(token: &str) -> Option<i64> {
    if let Some(hex) = token.strip_prefix('#') {
        i64::from_str_radix(hex, 16).ok()
    } else {
        token.parse().ok()
    }
}

/// Formats one watch item's current value, honoring the `-D` decimal flag for
/// register/memory contents (flags are always rendered as a single digit).
pub fn format(item: WatchItem, machine: &Machine, decimal: bool) -> String {
    match item {
        WatchItem::Pr => format!("PR=#{:04x}", machine.pr),
        WatchItem::Of => format!("OF=#{}", machine.flags.of as u8),
        WatchItem::Sf => format!("SF=#{}", machine.flags.sf as u8),
        WatchItem::Zf => format!("ZF=#{}", machine.flags.zf as u8),
        WatchItem::Gr(reg) => {
            let value = machine.gr(RegisterId::from_index(reg));
            if decimal {
                format!("GR{}=#{}", reg, value)
            } else {
                format!("GR{}=#{:04x}", reg, value)
            }
        }
        WatchItem::Mem(adr) => {
            let value = machine.memory.read(adr as u32);
            if decimal {
                format!("#{:04x}={}", adr, value)
            } else {
                format!("#{:04x}={:04x}", adr, value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_register_and_flag_tokens() {
        assert_eq!(parse("PR"), Ok(WatchItem::Pr));
        assert_eq!(parse("GR3"), Ok(WatchItem::Gr(3)));
        assert_eq!(parse("#0010"), Ok(WatchItem::Mem(0x10)));
    }

    #[test]
    fn rejects_out_of_range_register() {
        assert!(parse("GR9").is_err());
    }

    #[test]
    fn formats_gr_in_hex_or_decimal() {
        let mut machine = Machine::new();
        machine.set_gr(RegisterId::GR1, 10);
        assert_eq!(format(WatchItem::Gr(1), &machine, false), "GR1=#000a");
        assert_eq!(format(WatchItem::Gr(1), &machine, true), "GR1=#10");
    }
}
