#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Casl2(casl2::Error),
    Io(std::io::Error, IOErrorContext, PathBuf),
    Object(comet2_object::Error, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => writeln!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Object(err, path) => {
                writeln!(f, "Writing output file \"{}\" failed:", path.display())?;
                write!(f, "{}", err)
            }
            Error::Casl2(err) => {
                writeln!(f, "Assembly failed:")?;
                write!(f, "{}", err)
            }
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the CASL II source file to assemble")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Sets the object file to write (default: input with a .com extension)")
                .index(2),
        )
        .arg(
            Arg::with_name("listing")
                .short("a")
                .help("Prints an annotated address/code/line/source listing to stdout"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("OUTPUT");
    let listing = matches.is_present("listing");

    if let Err(err) = run(input, output, listing) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(input: &str, output: Option<&str>, listing: bool) -> Result<(), Error> {
    let input_path = Path::new(input);

    let input_file = File::open(input_path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;
    let mut source = String::new();
    BufReader::new(input_file)
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;

    let output_path: PathBuf = output.map(PathBuf::from).unwrap_or_else(|| input_path.with_extension("com"));

    let object = if listing {
        let (object, text) = casl2::assemble_with_listing(&source).map_err(Error::Casl2)?;
        print!("{}", text);
        object
    } else {
        casl2::assemble(&source).map_err(Error::Casl2)?
    };

    comet2_object::write_file(&output_path, &object)
        .map_err(|err| Error::Object(err, output_path.clone()))?;

    Ok(())
}
