//! End-to-end scenarios: assemble a small program, load the result onto a
//! `comet2::Machine` and check it runs to the expected final state, and
//! round-trip an assembled object through the on-disk file format.

use comet2::{BufferIo, Debugger, Machine, RegisterId, RunResult};
use std::io::Cursor;

#[test]
fn assembled_program_adds_two_constants() {
    let source = "\
MAIN    START
        LAD   GR1, 0
        LD    GR2, FIRST
        ADDA  GR1, GR2
        LD    GR2, SECOND
        ADDA  GR1, GR2
        RET
FIRST   DC    12
SECOND  DC    30
        END
";
    let object = casl2::assemble(source).unwrap();
    assert_eq!(object.entry(), 0);

    let mut machine = Machine::new();
    machine.memory.load_image(object.image());
    machine.pr = object.entry();

    let mut debugger = Debugger::new();
    let mut io = BufferIo::default();
    assert_eq!(debugger.run(&mut machine, &mut io), RunResult::Halted);
    assert_eq!(machine.gr(RegisterId::GR1), 42);
}

#[test]
fn object_round_trips_through_the_file_format() {
    let source = "\
MAIN    START
        LAD   GR1, =7
        RET
        END
";
    let object = casl2::assemble(source).unwrap();

    let mut buffer = Vec::new();
    comet2_object::write(&mut buffer, &object).unwrap();
    let read_back = comet2_object::read(&mut Cursor::new(buffer)).unwrap();

    assert_eq!(read_back, object);
}
