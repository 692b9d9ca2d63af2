//! Maps a CASL II mnemonic (plus its operand shape) to the `comet2::Opcode`
//! it encodes to. Most mnemonics name a single opcode; ten of them are
//! shared between the `R1R2` and `RADRX` encodings and are disambiguated by
//! operand shape per §4.3: "if the second operand begins with the two
//! characters `GR` followed by a digit 0..7, choose the R1R2 encoding;
//! otherwise choose the R-ADRX encoding."

use comet2::Opcode;

pub enum OpcodeSpec {
    Fixed(Opcode),
    /// (r1r2 form, r-adrx form)
    Ambiguous(Opcode, Opcode),
}

pub fn lookup(mnemonic: &str) -> Option<OpcodeSpec> {
    use Opcode::*;
    use OpcodeSpec::*;
    Some(match mnemonic {
        "NOP" => Fixed(Nop),
        "ST" => Fixed(St),
        "LAD" => Fixed(Lad),
        "LD" => Ambiguous(Ld1, Ld2),
        "ADDA" => Ambiguous(Adda1, Adda2),
        "SUBA" => Ambiguous(Suba1, Suba2),
        "ADDL" => Ambiguous(Addl1, Addl2),
        "SUBL" => Ambiguous(Subl1, Subl2),
        "AND" => Ambiguous(And1, And2),
        "OR" => Ambiguous(Or1, Or2),
        "XOR" => Ambiguous(Xor1, Xor2),
        "CPA" => Ambiguous(Cpa1, Cpa2),
        "CPL" => Ambiguous(Cpl1, Cpl2),
        "SLA" => Fixed(Sla),
        "SRA" => Fixed(Sra),
        "SLL" => Fixed(Sll),
        "SRL" => Fixed(Srl),
        "JMI" => Fixed(Jmi),
        "JNZ" => Fixed(Jnz),
        "JZE" => Fixed(Jze),
        "JUMP" => Fixed(Jump),
        "JPL" => Fixed(Jpl),
        "JOV" => Fixed(Jov),
        "PUSH" => Fixed(Push),
        "POP" => Fixed(Pop),
        "CALL" => Fixed(Call),
        "RET" => Fixed(Ret),
        "IN" => Fixed(In),
        "OUT" => Fixed(Out),
        "RPUSH" => Fixed(Rpush),
        "RPOP" => Fixed(Rpop),
        "SVC" => Fixed(Svc),
        _ => return None,
    })
}
