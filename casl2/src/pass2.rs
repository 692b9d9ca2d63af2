//! Pass 2: resolve every symbolic `Word` left by pass 1, append the literal
//! pool after the main program, and flatten the result into the final word
//! image plus the entry address for the object file.

use crate::error::{Error, ErrorKind};
use crate::ir::{LiteralValue, Word};
use crate::pass1::{literal_value_words, Pass1Output};
use crate::symtab::{SymbolTable, GLOBAL_SCOPE};

/// One fully-resolved line, kept around for the `-a` listing.
pub struct ResolvedLine {
    pub address: u16,
    pub words: Vec<u16>,
    pub line: u32,
    pub text: String,
}

pub struct Pass2Output {
    pub image: Vec<u16>,
    pub entry: u16,
    pub symtab: SymbolTable,
    pub lines: Vec<ResolvedLine>,
}

pub fn run(output: Pass1Output) -> Result<Pass2Output, Error> {
    let Pass1Output { bytecodes, symtab, literal_pool, first_start } = output;

    let first_start = first_start.ok_or_else(|| Error::new(0, "", ErrorKind::NoStart))?;

    let program_end = bytecodes
        .iter()
        .map(|bc| bc.address.wrapping_add(bc.words.len() as u16))
        .max()
        .unwrap_or(0);

    // Every literal's address is its pool position offset past the end of
    // the main program; values are never deduplicated, so position and
    // pool index coincide.
    let mut literal_addresses = Vec::with_capacity(literal_pool.entries().len());
    let mut addr = program_end;
    for value in literal_pool.entries() {
        literal_addresses.push(addr);
        addr = addr.wrapping_add(literal_value_words(value).len() as u16);
    }

    let mut lines = Vec::with_capacity(bytecodes.len() + literal_pool.entries().len());
    for bc in &bytecodes {
        let mut words = Vec::with_capacity(bc.words.len());
        for word in &bc.words {
            words.push(match word {
                Word::Value(v) => *v,
                Word::Label { scope, name } => symtab.resolve(scope, name, bc.line, &bc.text)?,
                Word::Literal(idx) => literal_addresses[*idx],
            });
        }
        lines.push(ResolvedLine { address: bc.address, words, line: bc.line, text: bc.text.clone() });
    }

    for (idx, (value, &address)) in literal_pool.entries().iter().zip(&literal_addresses).enumerate() {
        let words: Vec<u16> = literal_value_words(value)
            .into_iter()
            .map(|w| match w {
                Word::Value(v) => v,
                _ => unreachable!("a literal's synthesized DC only ever contains plain values"),
            })
            .collect();
        lines.push(ResolvedLine {
            address,
            words,
            line: 0,
            text: format!("_L{:04}  DC  {}", idx, display_literal(value)),
        });
    }

    let mut image = Vec::with_capacity(addr as usize);
    for line in &lines {
        image.extend_from_slice(&line.words);
    }

    let start_label = symtab
        .get(GLOBAL_SCOPE, &first_start)
        .expect("first_start names a label defined by pass 1's own START handling");
    let entry = symtab.resolve(GLOBAL_SCOPE, &first_start, start_label.line, &start_label.name)?;

    Ok(Pass2Output { image, entry, symtab, lines })
}

fn display_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Number(n) => n.to_string(),
        LiteralValue::Str(s) => format!("'{}'", s.replace('\'', "''")),
    }
}
