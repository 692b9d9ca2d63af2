//! Turns one physical source line into an `Instruction`, using the pest
//! grammar in `casl2.pest` to split it into a label, mnemonic and operand
//! tokens, then classifying each token into an `ir::Operand`.

use crate::error::{Error, ErrorKind};
use crate::grammar::{Casl2Parser, Rule};
use crate::ir::{Instruction, LiteralValue, Operand};
use comet2::RegisterId;
use pest::iterators::Pair;
use pest::Parser;
use std::str::FromStr;

/// Parses one source line. Returns `None` for blank or comment-only lines.
///
/// A label is only recognized when the line's first character is not
/// whitespace; that column-sensitivity can't be expressed inside pest's
/// (whitespace-erasing) grammar, so it's decided here before parsing.
pub fn parse_line(line_no: u32, text: &str) -> Result<Option<Instruction>, Error> {
    let trimmed = text.trim_end_matches(['\r', '\n'].as_ref());
    let has_label =
        matches!(trimmed.chars().next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let rule = if has_label { Rule::line_labeled } else { Rule::line_bare };

    let mut pairs = Casl2Parser::parse(rule, trimmed)
        .map_err(|err| Error::new(line_no, trimmed, ErrorKind::Syntax(Box::new(err))))?;
    let line_pair = pairs.next().unwrap();

    let mut label = None;
    let mut mnemonic = None;
    let mut operand_pairs = Vec::new();

    for pair in line_pair.into_inner() {
        match pair.as_rule() {
            Rule::bare_statement | Rule::labeled_statement => {
                for inner in pair.into_inner() {
                    match inner.as_rule() {
                        Rule::label => label = Some(inner.as_str().to_string()),
                        Rule::mnemonic => mnemonic = Some(inner.as_str().to_uppercase()),
                        Rule::operand_list => {
                            for operand in inner.into_inner() {
                                operand_pairs.push(operand);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Rule::comment | Rule::EOI => {}
            _ => {}
        }
    }

    let mnemonic = match mnemonic {
        Some(m) => m,
        None => return Ok(None),
    };

    let mut operands = Vec::with_capacity(operand_pairs.len());
    for pair in operand_pairs {
        operands.push(classify_operand(pair, line_no, trimmed)?);
    }

    Ok(Some(Instruction {
        label,
        mnemonic,
        operands,
        line: line_no,
        text: trimmed.to_string(),
    }))
}

fn classify_operand(pair: Pair<Rule>, line: u32, text: &str) -> Result<Operand, Error> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::hex_lit => Ok(Operand::Number(parse_hex(inner.as_str(), line, text)?)),
        Rule::dec_lit => Ok(Operand::Number(parse_dec(inner.as_str(), line, text)?)),
        Rule::str_lit => Ok(Operand::Str(unquote(inner.as_str()))),
        Rule::literal_lit => Ok(Operand::Literal(classify_literal(inner, line, text)?)),
        Rule::identifier => {
            let ident = inner.as_str();
            match RegisterId::from_str(ident) {
                Ok(id) => Ok(Operand::Register(id)),
                Err(_) => Ok(Operand::Label(ident.to_string())),
            }
        }
        _ => unreachable!("unexpected operand rule {:?}", inner.as_rule()),
    }
}

fn classify_literal(pair: Pair<Rule>, line: u32, text: &str) -> Result<LiteralValue, Error> {
    // `literal_lit` wraps its inner hex/dec/str token, prefixed by `=`.
    let body = pair.as_str()[1..].to_string();
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::hex_lit => Ok(LiteralValue::Number(parse_hex(&body, line, text)?)),
        Rule::dec_lit => Ok(LiteralValue::Number(parse_dec(&body, line, text)?)),
        Rule::str_lit => Ok(LiteralValue::Str(unquote(&body))),
        _ => unreachable!("unexpected literal rule {:?}", inner.as_rule()),
    }
}

fn parse_hex(text: &str, line: u32, source: &str) -> Result<u16, Error> {
    let digits = &text[1..];
    u16::from_str_radix(digits, 16)
        .map_err(|_| Error::new(line, source, ErrorKind::InvalidInteger(text.to_string())))
}

fn parse_dec(text: &str, line: u32, source: &str) -> Result<u16, Error> {
    text.parse::<i32>()
        .map(|v| (v & 0xffff) as u16)
        .map_err(|_| Error::new(line, source, ErrorKind::InvalidInteger(text.to_string())))
}

fn unquote(text: &str) -> String {
    text[1..text.len() - 1].replace("''", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_mnemonic_and_operands() {
        let inst = parse_line(1, "MAIN    LAD  GR1, 5").unwrap().unwrap();
        assert_eq!(inst.label.as_deref(), Some("MAIN"));
        assert_eq!(inst.mnemonic, "LAD");
        assert_eq!(inst.operands, vec![Operand::Register(RegisterId::GR1), Operand::Number(5)]);
    }

    #[test]
    fn blank_and_comment_only_lines_are_skipped() {
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(1, "   ").unwrap(), None);
        assert_eq!(parse_line(1, "; a full-line comment").unwrap(), None);
    }

    #[test]
    fn trailing_comment_is_ignored() {
        let inst = parse_line(1, "    RET  ; stop here").unwrap().unwrap();
        assert_eq!(inst.mnemonic, "RET");
        assert!(inst.operands.is_empty());
    }

    #[test]
    fn literal_operand_carries_its_value() {
        let inst = parse_line(1, "    SUBA GR1, =1").unwrap().unwrap();
        assert_eq!(
            inst.operands[1],
            Operand::Literal(LiteralValue::Number(1))
        );
    }

    #[test]
    fn hex_and_string_literals_parse() {
        let inst = parse_line(1, "    DC   #00ff").unwrap().unwrap();
        assert_eq!(inst.operands, vec![Operand::Number(0x00ff)]);

        let inst = parse_line(1, "    DC   'AB'").unwrap().unwrap();
        assert_eq!(inst.operands, vec![Operand::Str("AB".to_string())]);
    }
}
