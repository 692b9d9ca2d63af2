use super::{ArgType, Machine, Opcode, StepOutcome};
use crate::flags::Flags;
use crate::io::Io;
use crate::register::RegisterId;
use num_traits::FromPrimitive;

fn to_signed(value: u16) -> i32 {
    let v = value as i32;
    if v >= 0x8000 {
        v - 0x10000
    } else {
        v
    }
}

fn to_unsigned(value: i32) -> u16 {
    value.rem_euclid(0x10000) as u16
}

fn bit(value: u16, n: i32) -> bool {
    if n < 0 || n > 15 {
        false
    } else {
        (value >> n) & 1 != 0
    }
}

/// Fetches, decodes and executes the instruction at `machine.pr`, advancing `pr`
/// (or jumping, or halting) as dictated by the result.
pub fn step(machine: &mut Machine, io: &mut dyn Io) -> StepOutcome {
    let pr = machine.pr;
    let word0 = machine.memory.read(pr as u32);
    let (opcode_byte, r1, r2_or_x) = super::decode_first_word(word0);

    let opcode = match Opcode::from_u8(opcode_byte) {
        Some(op) => op,
        None => return StepOutcome::InvalidOpcode(word0),
    };

    machine.step_count += 1;

    let outcome = match opcode.arg_type() {
        ArgType::NoArg => execute_noarg(machine, opcode),
        ArgType::R => execute_r(machine, opcode, RegisterId::from_index(r1)),
        ArgType::R1R2 => execute_r1r2(
            machine,
            opcode,
            RegisterId::from_index(r1),
            RegisterId::from_index(r2_or_x),
        ),
        ArgType::AdrX => {
            let adr = machine.memory.read(pr as u32 + 1);
            let ea = machine.effective_address(adr, r2_or_x);
            execute_adrx(machine, opcode, ea, pr)
        }
        ArgType::RAdrX => {
            let r = RegisterId::from_index(r1);
            let adr = machine.memory.read(pr as u32 + 1);
            if is_shift(opcode) {
                let count = machine.effective_address(adr, r2_or_x);
                execute_shift(machine, opcode, r, count)
            } else {
                let ea = machine.effective_address(adr, r2_or_x);
                execute_radrx(machine, opcode, r, ea)
            }
        }
        ArgType::StrLen => {
            let s = machine.memory.read(pr as u32 + 1);
            let l = machine.memory.read(pr as u32 + 2);
            execute_strlen(machine, opcode, s, l, io)
        }
    };

    match outcome {
        StepOutcome::Continue => machine.pr = pr.wrapping_add(opcode.word_size()),
        StepOutcome::Jumped(addr) => machine.pr = addr,
        StepOutcome::Halt | StepOutcome::InvalidOpcode(_) => {}
    }

    outcome
}

fn is_shift(opcode: Opcode) -> bool {
    matches!(opcode, Opcode::Sla | Opcode::Sra | Opcode::Sll | Opcode::Srl)
}

fn execute_noarg(machine: &mut Machine, opcode: Opcode) -> StepOutcome {
    match opcode {
        Opcode::Nop => StepOutcome::Continue,
        Opcode::Ret => {
            if machine.call_depth == 0 {
                return StepOutcome::Halt;
            }
            let sp = machine.registers.sp();
            let return_addr = machine.memory.read(sp as u32);
            machine.registers.set_sp(sp.wrapping_add(1));
            machine.call_depth -= 1;
            StepOutcome::Jumped(return_addr)
        }
        Opcode::Rpush => {
            for i in 1..=7u8 {
                let sp = machine.registers.sp().wrapping_sub(1);
                machine.registers.set_sp(sp);
                let value = machine.gr(RegisterId::from_index(i));
                machine.memory.write(sp as u32, value);
            }
            StepOutcome::Continue
        }
        Opcode::Rpop => {
            for i in (1..=7u8).rev() {
                let sp = machine.registers.sp();
                let value = machine.memory.read(sp as u32);
                machine.set_gr(RegisterId::from_index(i), value);
                machine.registers.set_sp(sp.wrapping_add(1));
            }
            StepOutcome::Continue
        }
        _ => unreachable!("{:?} is not a NOARG instruction", opcode),
    }
}

fn execute_r(machine: &mut Machine, opcode: Opcode, r: RegisterId) -> StepOutcome {
    match opcode {
        Opcode::Pop => {
            let sp = machine.registers.sp();
            let value = machine.memory.read(sp as u32);
            machine.set_gr(r, value);
            machine.registers.set_sp(sp.wrapping_add(1));
            StepOutcome::Continue
        }
        _ => unreachable!("{:?} is not an R instruction", opcode),
    }
}

fn execute_r1r2(machine: &mut Machine, opcode: Opcode, r1: RegisterId, r2: RegisterId) -> StepOutcome {
    let a = machine.gr(r1);
    let b = machine.gr(r2);

    match opcode {
        Opcode::Ld1 => {
            machine.set_gr(r1, b);
            machine.flags = Flags::from_result(b, false);
        }
        Opcode::Adda1 => arithmetic(machine, r1, to_signed(a) + to_signed(b), false),
        Opcode::Suba1 => arithmetic(machine, r1, to_signed(a) - to_signed(b), false),
        Opcode::Addl1 => arithmetic(machine, r1, a as i32 + b as i32, true),
        Opcode::Subl1 => arithmetic(machine, r1, a as i32 - b as i32, true),
        Opcode::And1 => logic(machine, r1, a & b),
        Opcode::Or1 => logic(machine, r1, a | b),
        Opcode::Xor1 => logic(machine, r1, a ^ b),
        Opcode::Cpa1 => compare(machine, to_signed(a) - to_signed(b)),
        Opcode::Cpl1 => compare(machine, a as i32 - b as i32),
        _ => unreachable!("{:?} is not an R1R2 instruction", opcode),
    }
    StepOutcome::Continue
}

fn execute_radrx(machine: &mut Machine, opcode: Opcode, r: RegisterId, ea: u16) -> StepOutcome {
    match opcode {
        Opcode::Lad => machine.set_gr(r, ea),
        Opcode::St => {
            let value = machine.gr(r);
            machine.memory.write(ea as u32, value);
        }
        _ => {
            let v = machine.memory.read(ea as u32);
            let a = machine.gr(r);
            match opcode {
                Opcode::Ld2 => {
                    machine.set_gr(r, v);
                    machine.flags = Flags::from_result(v, false);
                }
                Opcode::Adda2 => arithmetic(machine, r, to_signed(a) + to_signed(v), false),
                Opcode::Suba2 => arithmetic(machine, r, to_signed(a) - to_signed(v), false),
                Opcode::Addl2 => arithmetic(machine, r, a as i32 + v as i32, true),
                Opcode::Subl2 => arithmetic(machine, r, a as i32 - v as i32, true),
                Opcode::And2 => logic(machine, r, a & v),
                Opcode::Or2 => logic(machine, r, a | v),
                Opcode::Xor2 => logic(machine, r, a ^ v),
                Opcode::Cpa2 => compare(machine, to_signed(a) - to_signed(v)),
                Opcode::Cpl2 => compare(machine, a as i32 - v as i32),
                _ => unreachable!("{:?} is not a RADRX instruction", opcode),
            }
        }
    }
    StepOutcome::Continue
}

/// Writes `value` (a signed or unsigned widened result) back to `r` and sets the
/// flags: `OF` from the widened result. `SF` for the signed (arithmetic) ops is
/// the masked 16-bit result's sign bit, but `ADDL`/`SUBL` take `SF` from bit 15
/// of the un-masked widened `value` itself, per pycasl2's own `flags(result,
/// logical=True)` (so a logical underflow like `0 - 1` masks to `0xFFFF` but
/// carries `SF=0`, not `1`).
fn arithmetic(machine: &mut Machine, r: RegisterId, value: i32, logical: bool) {
    let of = if logical {
        value < 0 || value > 0xffff
    } else {
        value < -32768 || value > 32767
    };
    let masked = to_unsigned(value);
    let sf = if logical {
        ((value >> 15) & 1) == 0
    } else {
        masked & 0x8000 != 0
    };
    machine.set_gr(r, masked);
    machine.flags = Flags { of, sf, zf: masked == 0 };
}

fn logic(machine: &mut Machine, r: RegisterId, value: u16) {
    machine.set_gr(r, value);
    machine.flags = Flags::from_result(value, false);
}

fn compare(machine: &mut Machine, diff: i32) {
    machine.flags.set(false, diff < 0, diff == 0);
}

fn execute_adrx(machine: &mut Machine, opcode: Opcode, ea: u16, pr: u16) -> StepOutcome {
    match opcode {
        Opcode::Jmi => jump_if(machine.flags.sf, ea),
        Opcode::Jnz => jump_if(!machine.flags.zf, ea),
        Opcode::Jze => jump_if(machine.flags.zf, ea),
        Opcode::Jump => StepOutcome::Jumped(ea),
        Opcode::Jpl => jump_if(!machine.flags.zf && !machine.flags.sf, ea),
        Opcode::Jov => jump_if(machine.flags.of, ea),
        Opcode::Push => {
            let sp = machine.registers.sp().wrapping_sub(1);
            machine.registers.set_sp(sp);
            machine.memory.write(sp as u32, ea);
            StepOutcome::Continue
        }
        Opcode::Call => {
            let sp = machine.registers.sp().wrapping_sub(1);
            machine.registers.set_sp(sp);
            // The pushed return address is the instruction following this CALL;
            // CALL is always the ADRX form, so that's `pr + 2`.
            machine
                .memory
                .write(sp as u32, pr.wrapping_add(Opcode::Call.word_size()));
            machine.call_depth += 1;
            StepOutcome::Jumped(ea)
        }
        // SVC's behavior beyond "re-execute" is a host concern; without a
        // handler installed it behaves as a no-op that does not advance PR.
        Opcode::Svc => StepOutcome::Jumped(pr),
        _ => unreachable!("{:?} is not an ADRX instruction", opcode),
    }
}

fn jump_if(condition: bool, ea: u16) -> StepOutcome {
    if condition {
        StepOutcome::Jumped(ea)
    } else {
        StepOutcome::Continue
    }
}

/// SLA/SRA/SLL/SRL: the operand's effective address is itself the shift count,
/// not a memory reference. A count of 0 leaves `OF` untouched.
fn execute_shift(machine: &mut Machine, opcode: Opcode, r: RegisterId, count: u16) -> StepOutcome {
    let original = machine.gr(r);
    let n = count as i32;
    let mut of = machine.flags.of;

    let result = match opcode {
        Opcode::Sla => {
            let sign = original & 0x8000;
            let shifted = if n < 16 {
                ((original as u32) << n) & 0x7fff
            } else {
                0
            };
            if n > 0 {
                of = bit(original, 15 - n);
            }
            (shifted as u16) | sign
        }
        Opcode::Sra => {
            // Arithmetic shift right: vacated high bits are filled from the
            // sign, not zeroed, so shift the signed value itself.
            let sign = original & 0x8000;
            let signed = to_signed(original);
            let shifted = (signed >> n.min(31)) as u16 & 0x7fff;
            if n > 0 {
                of = bit(original, n - 1);
            }
            shifted | sign
        }
        Opcode::Sll => {
            let shifted = if n < 16 { (original as u32) << n } else { 0 };
            if n > 0 {
                of = bit(original, 15 - (n - 1));
            }
            (shifted & 0xffff) as u16
        }
        Opcode::Srl => {
            let shifted = if n < 16 { (original as u32) >> n } else { 0 };
            if n > 0 {
                of = bit(original, n - 1);
            }
            shifted as u16
        }
        _ => unreachable!("{:?} is not a shift instruction", opcode),
    };

    machine.set_gr(r, result);
    machine.flags.set(of, result & 0x8000 != 0, result == 0);
    StepOutcome::Continue
}

fn execute_strlen(
    machine: &mut Machine,
    opcode: Opcode,
    s: u16,
    l: u16,
    io: &mut dyn Io,
) -> StepOutcome {
    match opcode {
        Opcode::In => {
            let line = io.read_line().unwrap_or_default();
            let len = line.chars().count().min(crate::constants::MAX_STRLEN);
            machine.memory.write(l as u32, len as u16);
            for (i, ch) in line.chars().take(len).enumerate() {
                machine.memory.write(s.wrapping_add(i as u16) as u32, ch as u16);
            }
        }
        Opcode::Out => {
            let len = machine.memory.read(l as u32);
            let mut line = String::with_capacity(len as usize);
            for i in 0..len {
                let ch = machine.memory.read(s.wrapping_add(i) as u32);
                line.push(char::from_u32(ch as u32).unwrap_or('\u{fffd}'));
            }
            let _ = io.write_line(&line);
        }
        _ => unreachable!("{:?} is not a STRLEN instruction", opcode),
    }
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufferIo;
    use crate::processor::encode_first_word;

    fn run(words: &[u16]) -> Machine {
        let mut machine = Machine::new();
        machine.memory.load_image(words);
        let mut io = BufferIo::default();
        loop {
            match step(&mut machine, &mut io) {
                StepOutcome::Halt | StepOutcome::InvalidOpcode(_) => break,
                _ => {}
            }
        }
        machine
    }

    #[test]
    fn halt_via_ret_with_no_call() {
        let program = [encode_first_word(Opcode::Ret as u8, 0, 0)];
        let machine = run(&program);
        assert_eq!(machine.pr, 0);
    }

    #[test]
    fn lad_does_not_touch_flags() {
        let mut machine = Machine::new();
        machine.flags.set(true, true, false);
        let program = [
            encode_first_word(Opcode::Lad as u8, RegisterId::GR1.index(), 0),
            5,
            encode_first_word(Opcode::Ret as u8, 0, 0),
        ];
        machine.memory.load_image(&program);
        let mut io = BufferIo::default();
        step(&mut machine, &mut io);
        assert_eq!(machine.gr(RegisterId::GR1), 5);
        assert_eq!(machine.flags.of, true);
        assert_eq!(machine.flags.zf, false);
    }

    #[test]
    fn suba_underflow_sets_overflow_and_sign() {
        // LAD GR1,0 ; SUBA GR1,=1 ; RET
        let program = [
            encode_first_word(Opcode::Lad as u8, RegisterId::GR1.index(), 0),
            0,
            encode_first_word(Opcode::Suba2 as u8, RegisterId::GR1.index(), 0),
            5, // address of the literal word below
            encode_first_word(Opcode::Ret as u8, 0, 0),
            1,
        ];
        let machine = run(&program);
        assert_eq!(machine.gr(RegisterId::GR1), 0xffff);
        assert_eq!(machine.flags.of, false);
        assert_eq!(machine.flags.sf, true);
        assert_eq!(machine.flags.zf, false);
    }

    #[test]
    fn subl_underflow_sets_overflow_without_sign() {
        // LAD GR1,0 ; SUBL GR1,=1 ; RET
        let program = [
            encode_first_word(Opcode::Lad as u8, RegisterId::GR1.index(), 0),
            0,
            encode_first_word(Opcode::Subl2 as u8, RegisterId::GR1.index(), 0),
            5,
            encode_first_word(Opcode::Ret as u8, 0, 0),
            1,
        ];
        let machine = run(&program);
        assert_eq!(machine.gr(RegisterId::GR1), 0xffff);
        assert_eq!(machine.flags.of, true);
        assert_eq!(machine.flags.sf, false);
        assert_eq!(machine.flags.zf, false);
    }

    #[test]
    fn sla_shift_of_fifteen_overflows_and_clears_sign() {
        // LAD GR1,1 ; SLA GR1,15 ; RET
        let program = [
            encode_first_word(Opcode::Lad as u8, RegisterId::GR1.index(), 0),
            1,
            encode_first_word(Opcode::Sla as u8, RegisterId::GR1.index(), 0),
            15,
            encode_first_word(Opcode::Ret as u8, 0, 0),
        ];
        let machine = run(&program);
        assert_eq!(machine.gr(RegisterId::GR1), 0x0000);
        assert_eq!(machine.flags.of, true);
        assert_eq!(machine.flags.sf, false);
    }

    #[test]
    fn sra_fills_vacated_bits_from_the_sign() {
        // LAD GR1,#C000 ; SRA GR1,1 ; RET
        let program = [
            encode_first_word(Opcode::Lad as u8, RegisterId::GR1.index(), 0),
            0xc000,
            encode_first_word(Opcode::Sra as u8, RegisterId::GR1.index(), 0),
            1,
            encode_first_word(Opcode::Ret as u8, 0, 0),
        ];
        let machine = run(&program);
        assert_eq!(machine.gr(RegisterId::GR1), 0xe000);
        assert_eq!(machine.flags.sf, true);
    }

    #[test]
    fn jov_jumps_only_when_overflow_set() {
        let mut machine = Machine::new();
        machine.flags.of = true;
        let program = [
            encode_first_word(Opcode::Jov as u8, 0, 0),
            10,
            encode_first_word(Opcode::Nop as u8, 0, 0),
        ];
        machine.memory.load_image(&program);
        let mut io = BufferIo::default();
        let outcome = step(&mut machine, &mut io);
        assert_eq!(outcome, StepOutcome::Jumped(10));
    }

    #[test]
    fn call_then_ret_restores_pr_and_balances_call_depth() {
        // 0: CALL 4,0 ; 2: NOP (return lands here) ; 3: (pad, unreachable)
        // 4: RET
        let program = [
            encode_first_word(Opcode::Call as u8, 0, 0),
            4,
            encode_first_word(Opcode::Nop as u8, 0, 0),
            encode_first_word(Opcode::Nop as u8, 0, 0),
            encode_first_word(Opcode::Ret as u8, 0, 0),
        ];
        let mut machine = Machine::new();
        machine.memory.load_image(&program);
        let mut io = BufferIo::default();
        let initial_sp = machine.registers.sp();

        assert_eq!(step(&mut machine, &mut io), StepOutcome::Jumped(4));
        assert_eq!(machine.call_depth, 1);
        assert_eq!(step(&mut machine, &mut io), StepOutcome::Jumped(2));
        assert_eq!(machine.call_depth, 0);
        assert_eq!(machine.registers.sp(), initial_sp);
    }

    #[test]
    fn rpush_rpop_round_trip_seven_registers() {
        let program = [
            encode_first_word(Opcode::Rpush as u8, 0, 0),
            encode_first_word(Opcode::Rpop as u8, 0, 0),
            encode_first_word(Opcode::Ret as u8, 0, 0),
        ];
        let mut machine = Machine::new();
        for i in 1..=7u8 {
            machine.set_gr(RegisterId::from_index(i), 0x1000 + i as u16);
        }
        machine.memory.load_image(&program);
        let mut io = BufferIo::default();
        let initial_sp = machine.registers.sp();
        step(&mut machine, &mut io);
        step(&mut machine, &mut io);
        assert_eq!(machine.registers.sp(), initial_sp);
        for i in 1..=7u8 {
            assert_eq!(machine.gr(RegisterId::from_index(i)), 0x1000 + i as u16);
        }
    }

    #[test]
    fn in_then_out_round_trips_a_string() {
        // IN/OUT's operand words are (s, l): s = string start address, l = length cell.
        let program = [
            encode_first_word(Opcode::In as u8, 0, 0),
            200,
            100,
            encode_first_word(Opcode::Out as u8, 0, 0),
            200,
            100,
            encode_first_word(Opcode::Ret as u8, 0, 0),
        ];
        let mut machine = Machine::new();
        machine.memory.load_image(&program);
        let mut io = BufferIo::with_input(vec!["HELLO"]);
        step(&mut machine, &mut io);
        assert_eq!(machine.memory.read(100), 5);
        step(&mut machine, &mut io);
        assert_eq!(io.output, vec!["HELLO".to_string()]);
    }
}
