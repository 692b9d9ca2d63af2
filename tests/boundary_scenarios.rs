use comet2::processor::{encode_first_word, Opcode};
use comet2::{BufferIo, Machine, RegisterId, StepOutcome};

fn run_to_halt(words: &[u16]) -> Machine {
    let mut machine = Machine::new();
    machine.memory.load_image(words);
    let mut io = BufferIo::default();
    loop {
        match comet2::step(&mut machine, &mut io) {
            StepOutcome::Halt | StepOutcome::InvalidOpcode(_) => break,
            _ => {}
        }
    }
    machine
}

#[test]
fn lad_lad_adda_ret() {
    // START MAIN / LAD GR1,5 / LAD GR2,3 / ADDA GR1,GR2 / RET
    let program = [
        encode_first_word(Opcode::Lad as u8, RegisterId::GR1.index(), 0),
        5,
        encode_first_word(Opcode::Lad as u8, RegisterId::GR2.index(), 0),
        3,
        encode_first_word(Opcode::Adda1 as u8, RegisterId::GR1.index(), RegisterId::GR2.index()),
        encode_first_word(Opcode::Ret as u8, 0, 0),
    ];
    let machine = run_to_halt(&program);
    assert_eq!(machine.gr(RegisterId::GR1), 8);
    assert_eq!(machine.flags.zf, false);
    assert_eq!(machine.flags.sf, false);
    assert_eq!(machine.flags.of, false);
    assert_eq!(machine.step_count, 4);
}

#[test]
fn call_ret_balance_through_a_subroutine() {
    // MAIN: CALL SUB ; RET
    // SUB:  PUSH GR1 ; POP GR1 ; RET
    let program = [
        encode_first_word(Opcode::Call as u8, 0, 0),
        3,
        encode_first_word(Opcode::Ret as u8, 0, 0),
        encode_first_word(Opcode::Push as u8, 0, RegisterId::GR1.index()),
        0,
        encode_first_word(Opcode::Pop as u8, RegisterId::GR1.index(), 0),
        encode_first_word(Opcode::Ret as u8, 0, 0),
    ];
    // PUSH's "ADRX" operand addresses GR1 through the index register, pushing
    // its value the same way SLA/SRA treat their count: via the index path.
    let mut machine = Machine::new();
    machine.set_gr(RegisterId::GR1, 0x55aa);
    let initial_sp = machine.registers.sp();
    machine.memory.load_image(&program);
    let mut io = BufferIo::default();
    loop {
        match comet2::step(&mut machine, &mut io) {
            StepOutcome::Halt | StepOutcome::InvalidOpcode(_) => break,
            _ => {}
        }
    }
    assert_eq!(machine.registers.sp(), initial_sp);
    assert_eq!(machine.gr(RegisterId::GR1), 0x55aa);
    assert_eq!(machine.call_depth, 0);
}
