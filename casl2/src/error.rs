//! Assembly errors: always fatal, always tied to a source line.
//!
//! Grounded in `vasm::error`: a hand-rolled enum per crate with `Display` and
//! `From` conversions from its constituent error sources, no `anyhow`/`thiserror`.

use crate::grammar::Rule;
use std::fmt;

/// One fatal error encountered while assembling, together with the source
/// line it was reported against.
#[derive(Debug)]
pub struct Error {
    pub line: u32,
    pub text: String,
    pub kind: ErrorKind,
}

#[derive(Debug)]
pub enum ErrorKind {
    Syntax(Box<pest::error::Error<Rule>>),
    UnknownMnemonic(String),
    WrongOperandCount { mnemonic: String, expected: String, found: usize },
    InvalidRegister(String),
    InvalidInteger(String),
    MissingLabel(&'static str),
    DuplicateLabel(String),
    UndefinedLabel(String),
    NoStart,
    Io(std::io::Error),
}

impl Error {
    pub fn new(line: u32, text: impl Into<String>, kind: ErrorKind) -> Error {
        Error { line, text: text.into(), kind }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "line {}: {}", self.line, self.text)?;
        match &self.kind {
            ErrorKind::Syntax(err) => write!(f, "{}", err),
            ErrorKind::UnknownMnemonic(m) => write!(f, "unknown mnemonic \"{}\"", m),
            ErrorKind::WrongOperandCount { mnemonic, expected, found } => write!(
                f,
                "\"{}\" expects {} operand(s), found {}",
                mnemonic, expected, found
            ),
            ErrorKind::InvalidRegister(r) => write!(f, "invalid register name \"{}\"", r),
            ErrorKind::InvalidInteger(v) => write!(f, "invalid integer literal \"{}\"", v),
            ErrorKind::MissingLabel(directive) => {
                write!(f, "{} requires a label", directive)
            }
            ErrorKind::DuplicateLabel(name) => write!(f, "duplicate label \"{}\"", name),
            ErrorKind::UndefinedLabel(name) => write!(f, "undefined label \"{}\"", name),
            ErrorKind::NoStart => write!(f, "no START directive found"),
            ErrorKind::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
