//! Two-pass assembler for CASL II, targeting COMET II object files.
//!
//! [`assemble`] runs both passes and returns an object ready to write out;
//! [`assemble_with_listing`] additionally renders the `-a` annotated listing.

mod error;
mod grammar;
mod ir;
mod lexer;
mod listing;
mod opcodes;
mod pass1;
mod pass2;
mod symtab;

pub use error::{Error, ErrorKind, Result};

pub fn assemble(source: &str) -> Result<comet2_object::Object> {
    let output = pass1::run(source)?;
    let resolved = pass2::run(output)?;
    Ok(comet2_object::Object::new(resolved.entry, resolved.image))
}

pub fn assemble_with_listing(source: &str) -> Result<(comet2_object::Object, String)> {
    let output = pass1::run(source)?;
    let resolved = pass2::run(output)?;
    let text = listing::render(&resolved);
    let object = comet2_object::Object::new(resolved.entry, resolved.image);
    Ok((object, text))
}

#[cfg(test)]
mod test;
