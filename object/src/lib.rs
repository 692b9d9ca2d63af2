//! The COMET II object file format: an eight-word big-endian header (magic,
//! entry address, five reserved words) followed by the program image, loaded
//! into memory starting at address 0.

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use util::Endian;

const MAGIC: [u16; 2] = [0x4341, 0x534c];
const HEADER_WORDS: usize = 8;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    BadMagic([u16; 2]),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{}", err),
            Error::BadMagic(found) => write!(
                f,
                "not a COMET II object file: expected magic {:04x}{:04x}, found {:04x}{:04x}",
                MAGIC[0], MAGIC[1], found[0], found[1]
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

/// An assembled program: its entry address and the word image to load at
/// address 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    entry: u16,
    image: Vec<u16>,
}

impl Object {
    pub fn new(entry: u16, image: Vec<u16>) -> Object {
        Object { entry, image }
    }

    pub fn entry(&self) -> u16 {
        self.entry
    }

    pub fn image(&self) -> &[u16] {
        &self.image[..]
    }
}

pub fn read<R: Read>(reader: &mut R) -> Result<Object, Error> {
    let magic = [
        reader.read_u16::<Endian>()?,
        reader.read_u16::<Endian>()?,
    ];
    if magic != MAGIC {
        return Err(Error::BadMagic(magic));
    }

    let entry = reader.read_u16::<Endian>()?;
    for _ in 0..(HEADER_WORDS - 3) {
        reader.read_u16::<Endian>()?;
    }

    let mut image = Vec::new();
    loop {
        match reader.read_u16::<Endian>() {
            Ok(word) => image.push(word),
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(Error::Io(err)),
        }
    }

    Ok(Object::new(entry, image))
}

pub fn write<W: Write>(writer: &mut W, object: &Object) -> Result<(), Error> {
    writer.write_u16::<Endian>(MAGIC[0])?;
    writer.write_u16::<Endian>(MAGIC[1])?;
    writer.write_u16::<Endian>(object.entry)?;
    for _ in 0..(HEADER_WORDS - 3) {
        writer.write_u16::<Endian>(0)?;
    }
    for &word in &object.image {
        writer.write_u16::<Endian>(word)?;
    }
    Ok(())
}

pub trait ReadObjectExt: Read + Sized {
    fn read_object(&mut self) -> Result<Object, Error> {
        read(self)
    }
}

impl<R: Read + Sized> ReadObjectExt for R {}

pub trait WriteObjectExt: Write + Sized {
    fn write_object(&mut self, object: &Object) -> Result<(), Error> {
        write(self, object)
    }
}

impl<W: Write + Sized> WriteObjectExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Object, Error> {
    BufReader::new(File::open(path)?).read_object()
}

pub fn write_file<P: AsRef<Path>>(path: P, object: &Object) -> Result<(), Error> {
    BufWriter::new(File::create(path)?).write_object(object)
}

#[cfg(test)]
mod test;
