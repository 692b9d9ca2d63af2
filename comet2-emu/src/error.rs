//! Loader and CLI errors. Execution errors (invalid opcode, bad REPL input)
//! never reach here: they're reported to stderr and handled in place, per
//! the "execution errors never terminate the REPL" policy.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Object(comet2_object::Error, PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Object(err, path) => write!(f, "loading \"{}\" failed: {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {}
