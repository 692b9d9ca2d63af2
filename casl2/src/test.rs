//! Assembler-level integration tests: the scenarios named in the
//! specification's testable-properties list that exercise more than one
//! module at once (literal pool placement, scope-qualified labels, `START`
//! entry aliasing).

use crate::assemble;
use comet2::processor::encode_first_word;
use comet2::Opcode;

#[test]
fn literal_operand_is_appended_as_a_trailing_dc() {
    let source = "\
MAIN    START
        LAD   GR1, =5
        RET
        END
";
    let object = assemble(source).unwrap();
    assert_eq!(object.entry(), 0);
    assert_eq!(
        object.image(),
        &[
            encode_first_word(Opcode::Lad as u8, 1, 0),
            3, // address of the synthesized literal
            encode_first_word(Opcode::Ret as u8, 0, 0),
            5, // the literal's value
        ]
    );
}

#[test]
fn same_named_labels_in_different_start_blocks_resolve_to_their_own_scope() {
    let source = "\
A       START
        LAD   GR1, LOOP
LOOP    LAD   GR2, 0
        RET
        END
B       START
        LAD   GR1, LOOP
LOOP    LAD   GR2, 1
        RET
        END
";
    let object = assemble(source).unwrap();
    assert_eq!(object.entry(), 0);
    // Address operand of each block's `LAD GR1, LOOP` is the second word of
    // that instruction.
    assert_eq!(object.image()[1], 2); // A.LOOP
    assert_eq!(object.image()[6], 7); // B.LOOP
}

#[test]
fn start_with_entry_operand_resolves_external_references_to_that_label() {
    let source = "\
MAIN    START
        LAD   GR1, SUB
        RET
        END
SUB     START MAIN
        NOP
MAIN    LAD   GR2, 1
        RET
        END
";
    let object = assemble(source).unwrap();
    assert_eq!(object.entry(), 0);
    // `LAD GR1, SUB` must resolve to the address of SUB's own internal
    // `MAIN` label, not to SUB's START line itself.
    assert_eq!(object.image()[1], 4);
    assert_eq!(object.image().len(), 7);
}

#[test]
fn undefined_label_is_a_fatal_error() {
    let source = "\
MAIN    START
        LAD   GR1, NOWHERE
        RET
        END
";
    assert!(assemble(source).is_err());
}

#[test]
fn duplicate_label_in_the_same_scope_is_a_fatal_error() {
    let source = "\
MAIN    START
LOOP    NOP
LOOP    NOP
        RET
        END
";
    assert!(assemble(source).is_err());
}

#[test]
fn ambiguous_mnemonic_picks_r1r2_when_the_second_operand_is_a_register() {
    let source = "\
MAIN    START
        LD    GR1, GR2
        RET
        END
";
    let object = assemble(source).unwrap();
    assert_eq!(object.image()[0], encode_first_word(Opcode::Ld1 as u8, 1, 2));
}

#[test]
fn ambiguous_mnemonic_picks_radrx_when_the_second_operand_is_an_address() {
    let source = "\
MAIN    START
        LD    GR1, VAL
VAL     DC    42
        RET
        END
";
    let object = assemble(source).unwrap();
    assert_eq!(object.image()[0], encode_first_word(Opcode::Ld2 as u8, 1, 0));
}
