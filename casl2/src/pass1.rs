//! Pass 1: lex every source line, lay out addresses, populate the symbol
//! table, and emit `ByteCode` records whose address-type operands may still
//! be symbolic (a label name, or a literal-pool index) per §4.3.

use crate::error::{Error, ErrorKind};
use crate::ir::{ByteCode, Instruction, LiteralValue, Operand, Word};
use crate::lexer::parse_line;
use crate::opcodes::{self, OpcodeSpec};
use crate::symtab::{LiteralPool, SymbolTable, GLOBAL_SCOPE};
use comet2::processor::{encode_first_word, ArgType};
use comet2::{Opcode, RegisterId};

pub struct Pass1Output {
    pub bytecodes: Vec<ByteCode>,
    pub symtab: SymbolTable,
    pub literal_pool: LiteralPool,
    /// The label of the first `START` seen; its resolved address becomes
    /// the object file's entry address.
    pub first_start: Option<String>,
}

pub fn run(source: &str) -> Result<Pass1Output, Error> {
    let mut bytecodes = Vec::new();
    let mut symtab = SymbolTable::new();
    let mut literal_pool = LiteralPool::new();
    let mut first_start = None;
    let mut scope = GLOBAL_SCOPE.to_string();
    let mut address: u16 = 0;

    for (offset, raw_line) in source.lines().enumerate() {
        let line_no = offset as u32 + 1;
        let inst = match parse_line(line_no, raw_line)? {
            Some(inst) => inst,
            None => continue,
        };

        match inst.mnemonic.as_str() {
            "START" => {
                let label = inst
                    .label
                    .clone()
                    .ok_or_else(|| Error::new(inst.line, &inst.text, ErrorKind::MissingLabel("START")))?;
                let goto = match inst.operands.first() {
                    None => None,
                    Some(Operand::Label(name)) => Some(name.clone()),
                    Some(_) => {
                        return Err(Error::new(
                            inst.line,
                            &inst.text,
                            ErrorKind::WrongOperandCount {
                                mnemonic: "START".to_string(),
                                expected: "a label".to_string(),
                                found: inst.operands.len(),
                            },
                        ))
                    }
                };
                define(&mut symtab, GLOBAL_SCOPE, &label, &inst, address, goto)?;
                if first_start.is_none() {
                    first_start = Some(label.clone());
                }
                scope = label;
            }
            "END" => {
                scope = GLOBAL_SCOPE.to_string();
            }
            "DC" => {
                if let Some(label) = &inst.label {
                    define(&mut symtab, &scope, label, &inst, address, None)?;
                }
                let words = dc_words(&inst)?;
                let start = address;
                address = address.wrapping_add(words.len() as u16);
                bytecodes.push(ByteCode { address: start, words, line: inst.line, text: inst.text.clone() });
            }
            "DS" => {
                if let Some(label) = &inst.label {
                    define(&mut symtab, &scope, label, &inst, address, None)?;
                }
                let n = match inst.operands.first() {
                    Some(Operand::Number(n)) => *n,
                    _ => {
                        return Err(Error::new(
                            inst.line,
                            &inst.text,
                            ErrorKind::WrongOperandCount {
                                mnemonic: "DS".to_string(),
                                expected: "a word count".to_string(),
                                found: inst.operands.len(),
                            },
                        ))
                    }
                };
                let words = vec![Word::Value(0); n as usize];
                bytecodes.push(ByteCode { address, words, line: inst.line, text: inst.text.clone() });
                address = address.wrapping_add(n);
            }
            mnemonic => {
                if let Some(label) = &inst.label {
                    define(&mut symtab, &scope, label, &inst, address, None)?;
                }
                let spec = opcodes::lookup(mnemonic)
                    .ok_or_else(|| Error::new(inst.line, &inst.text, ErrorKind::UnknownMnemonic(mnemonic.to_string())))?;
                let opcode = resolve_opcode(spec, &inst.operands);
                let words = encode_operands(opcode, &inst, &scope, &mut literal_pool)?;
                bytecodes.push(ByteCode { address, words, line: inst.line, text: inst.text.clone() });
                address = address.wrapping_add(opcode.word_size());
            }
        }
    }

    Ok(Pass1Output { bytecodes, symtab, literal_pool, first_start })
}

fn define(
    symtab: &mut SymbolTable,
    scope: &str,
    name: &str,
    inst: &Instruction,
    address: u16,
    goto: Option<String>,
) -> Result<(), Error> {
    symtab
        .define(scope, name, inst.line, address, goto)
        .map_err(|qualified| Error::new(inst.line, &inst.text, ErrorKind::DuplicateLabel(qualified)))
}

fn dc_words(inst: &Instruction) -> Result<Vec<Word>, Error> {
    if inst.operands.len() != 1 {
        return Err(Error::new(
            inst.line,
            &inst.text,
            ErrorKind::WrongOperandCount {
                mnemonic: "DC".to_string(),
                expected: "exactly one value".to_string(),
                found: inst.operands.len(),
            },
        ));
    }
    match &inst.operands[0] {
        Operand::Number(n) => Ok(vec![Word::Value(*n)]),
        Operand::Str(s) => Ok(literal_value_words(&LiteralValue::Str(s.clone()))),
        other => Err(Error::new(
            inst.line,
            &inst.text,
            ErrorKind::InvalidInteger(format!("{:?}", other)),
        )),
    }
}

/// Expands a literal-pool entry's value into the words its synthesized `DC`
/// occupies: one word for a number, one word per character for a string.
pub fn literal_value_words(value: &LiteralValue) -> Vec<Word> {
    match value {
        LiteralValue::Number(n) => vec![Word::Value(*n)],
        LiteralValue::Str(s) => s.chars().map(|c| Word::Value(c as u16)).collect(),
    }
}

fn resolve_opcode(spec: OpcodeSpec, operands: &[Operand]) -> Opcode {
    match spec {
        OpcodeSpec::Fixed(op) => op,
        OpcodeSpec::Ambiguous(r1r2, radrx) => match operands.get(1) {
            Some(Operand::Register(_)) => r1r2,
            _ => radrx,
        },
    }
}

fn encode_operands(
    opcode: Opcode,
    inst: &Instruction,
    scope: &str,
    literal_pool: &mut LiteralPool,
) -> Result<Vec<Word>, Error> {
    let operands = &inst.operands;
    let expect_count = |expected: &str, n: usize| -> Result<(), Error> {
        Err(Error::new(
            inst.line,
            &inst.text,
            ErrorKind::WrongOperandCount {
                mnemonic: opcode.mnemonic().to_string(),
                expected: expected.to_string(),
                found: n,
            },
        ))
    };

    let register_at = |index: usize| -> Result<RegisterId, Error> {
        match operands.get(index) {
            Some(Operand::Register(r)) => Ok(*r),
            Some(other) => Err(Error::new(
                inst.line,
                &inst.text,
                ErrorKind::InvalidRegister(format!("{:?}", other)),
            )),
            None => Err(Error::new(
                inst.line,
                &inst.text,
                ErrorKind::WrongOperandCount {
                    mnemonic: opcode.mnemonic().to_string(),
                    expected: "a register".to_string(),
                    found: operands.len(),
                },
            )),
        }
    };

    match opcode.arg_type() {
        ArgType::NoArg => {
            if !operands.is_empty() {
                return expect_count("none", operands.len());
            }
            Ok(vec![Word::Value(encode_first_word(opcode as u8, 0, 0))])
        }
        ArgType::R => {
            if operands.len() != 1 {
                return expect_count("exactly one register", operands.len());
            }
            let r = register_at(0)?;
            Ok(vec![Word::Value(encode_first_word(opcode as u8, r.index(), 0))])
        }
        ArgType::R1R2 => {
            if operands.len() != 2 {
                return expect_count("two registers", operands.len());
            }
            let r1 = register_at(0)?;
            let r2 = register_at(1)?;
            Ok(vec![Word::Value(encode_first_word(opcode as u8, r1.index(), r2.index()))])
        }
        ArgType::AdrX => {
            if operands.is_empty() || operands.len() > 2 {
                return expect_count("an address and optional index register", operands.len());
            }
            let x = match operands.get(1) {
                Some(Operand::Register(r)) => r.index(),
                Some(other) => {
                    return Err(Error::new(
                        inst.line,
                        &inst.text,
                        ErrorKind::InvalidRegister(format!("{:?}", other)),
                    ))
                }
                None => 0,
            };
            let adr = operand_to_word(&operands[0], inst, scope, literal_pool)?;
            Ok(vec![Word::Value(encode_first_word(opcode as u8, 0, x)), adr])
        }
        ArgType::RAdrX => {
            if operands.len() < 2 || operands.len() > 3 {
                return expect_count("a register, an address, and optional index register", operands.len());
            }
            let r = register_at(0)?;
            let x = match operands.get(2) {
                Some(Operand::Register(reg)) => reg.index(),
                Some(other) => {
                    return Err(Error::new(
                        inst.line,
                        &inst.text,
                        ErrorKind::InvalidRegister(format!("{:?}", other)),
                    ))
                }
                None => 0,
            };
            let adr = operand_to_word(&operands[1], inst, scope, literal_pool)?;
            Ok(vec![Word::Value(encode_first_word(opcode as u8, r.index(), x)), adr])
        }
        ArgType::StrLen => {
            if operands.len() != 2 {
                return expect_count("two addresses", operands.len());
            }
            let s = operand_to_word(&operands[0], inst, scope, literal_pool)?;
            let l = operand_to_word(&operands[1], inst, scope, literal_pool)?;
            Ok(vec![Word::Value(encode_first_word(opcode as u8, 0, 0)), s, l])
        }
    }
}

fn operand_to_word(
    operand: &Operand,
    inst: &Instruction,
    scope: &str,
    literal_pool: &mut LiteralPool,
) -> Result<Word, Error> {
    match operand {
        Operand::Number(n) => Ok(Word::Value(*n)),
        Operand::Label(name) => Ok(Word::Label { scope: scope.to_string(), name: name.clone() }),
        Operand::Literal(value) => Ok(Word::Literal(literal_pool.push(value.clone()))),
        other => Err(Error::new(
            inst.line,
            &inst.text,
            ErrorKind::InvalidInteger(format!("{:?}", other)),
        )),
    }
}
