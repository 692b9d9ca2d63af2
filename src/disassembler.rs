//! Renders instructions back to CASL II-like text, matching the reference
//! disassembler's column layout (`%-8s` mnemonic followed by comma-separated
//! operands).

use crate::memory::Memory;
use crate::processor::{decode_first_word, ArgType, Opcode};
use num_traits::FromPrimitive;

/// One disassembled instruction: its rendered text and the number of words it
/// occupied, so callers can advance to the next instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disassembled {
    pub text: String,
    pub word_size: u16,
}

fn gr(index: u8) -> String {
    format!("GR{}", index)
}

/// Disassembles the instruction at `address`. Unknown opcodes render as a `DC`
/// directive holding the raw word, same as the reference tool falls back to.
pub fn disassemble(memory: &Memory, address: u16) -> Disassembled {
    let word0 = memory.read(address as u32);
    let (opcode_byte, r1, r2_or_x) = decode_first_word(word0);

    match Opcode::from_u8(opcode_byte) {
        Some(opcode) => disassemble_known(memory, address, opcode, r1, r2_or_x),
        None => Disassembled {
            text: format!("{:<8}#{:04x}", "DC", word0),
            word_size: 1,
        },
    }
}

fn disassemble_known(memory: &Memory, address: u16, opcode: Opcode, r1: u8, r2_or_x: u8) -> Disassembled {
    let mnemonic = opcode.mnemonic();
    let word_size = opcode.word_size();

    let text = match opcode.arg_type() {
        ArgType::NoArg => format!("{:<8}", mnemonic),
        ArgType::R => format!("{:<8}{}", mnemonic, gr(r1)),
        ArgType::R1R2 => format!("{:<8}{}, {}", mnemonic, gr(r1), gr(r2_or_x)),
        ArgType::AdrX => {
            let adr = memory.read(address as u32 + 1);
            if r2_or_x == 0 {
                format!("{:<8}#{:04x}", mnemonic, adr)
            } else {
                format!("{:<8}#{:04x}, {}", mnemonic, adr, gr(r2_or_x))
            }
        }
        ArgType::RAdrX => {
            let adr = memory.read(address as u32 + 1);
            if r2_or_x == 0 {
                format!("{:<8}{}, #{:04x}", mnemonic, gr(r1), adr)
            } else {
                format!("{:<8}{}, #{:04x}, {}", mnemonic, gr(r1), adr, gr(r2_or_x))
            }
        }
        ArgType::StrLen => {
            let s = memory.read(address as u32 + 1);
            let l = memory.read(address as u32 + 2);
            format!("{:<8}#{:04x}, #{:04x}", mnemonic, s, l)
        }
    };

    Disassembled { text, word_size }
}

/// Disassembles `count` consecutive instructions starting at `address`.
pub fn disassemble_range(memory: &Memory, address: u16, count: u32) -> Vec<(u16, Disassembled)> {
    let mut result = Vec::with_capacity(count as usize);
    let mut addr = address;
    for _ in 0..count {
        let inst = disassemble(memory, addr);
        let size = inst.word_size;
        result.push((addr, inst));
        addr = addr.wrapping_add(size);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::encode_first_word;

    #[test]
    fn disassembles_radrx_with_index_register() {
        let mut memory = Memory::new();
        memory.load_image(&[encode_first_word(Opcode::Ld2 as u8, 1, 2), 0x0010]);
        let inst = disassemble(&memory, 0);
        assert_eq!(inst.text, "LD      GR1, #0010, GR2");
        assert_eq!(inst.word_size, 2);
    }

    #[test]
    fn disassembles_noarg() {
        let mut memory = Memory::new();
        memory.load_image(&[encode_first_word(Opcode::Ret as u8, 0, 0)]);
        assert_eq!(disassemble(&memory, 0).text, "RET     ");
    }

    #[test]
    fn unknown_opcode_falls_back_to_dc() {
        let mut memory = Memory::new();
        memory.load_image(&[0x0500]);
        assert_eq!(disassemble(&memory, 0).text, "DC      #0500");
    }
}
