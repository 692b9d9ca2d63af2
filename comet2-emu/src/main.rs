#[macro_use]
extern crate clap;

mod error;
mod repl;
mod state;
mod watch;

use clap::Arg;
use comet2::{Debugger, Machine, StdIo};
use error::Error;
use std::path::Path;

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the COMET II object file to load")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("count")
                .short("c")
                .help("Prints the instruction step count at halt"),
        )
        .arg(
            Arg::with_name("dump")
                .short("d")
                .help("Writes last_state.txt at halt"),
        )
        .arg(
            Arg::with_name("run")
                .short("r")
                .help("Runs non-interactively instead of starting the REPL"),
        )
        .arg(
            Arg::with_name("watch")
                .short("w")
                .takes_value(true)
                .value_name("VARS")
                .help("Enters watch mode, printing a status line per step for the given comma-separated items"),
        )
        .arg(
            Arg::with_name("decimal")
                .short("D")
                .help("Formats watched register/memory values as decimal"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let print_count = matches.is_present("count");
    let dump_state = matches.is_present("dump");
    let run_flag = matches.is_present("run");
    let decimal = matches.is_present("decimal");
    let watch_spec = matches.value_of("watch");

    if let Err(err) = run(input, print_count, dump_state, run_flag, decimal, watch_spec) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(
    input: &str,
    print_count: bool,
    dump_state: bool,
    run_flag: bool,
    decimal: bool,
    watch_spec: Option<&str>,
) -> Result<(), Error> {
    let input_path = Path::new(input);
    let object = comet2_object::read_file(input_path)
        .map_err(|err| Error::Object(err, input_path.to_owned()))?;

    let mut machine = Machine::new();
    machine.memory.load_image(object.image());
    machine.pr = object.entry();

    let mut debugger = Debugger::new();
    let mut io = StdIo;

    if let Some(spec) = watch_spec {
        let items = watch::parse_items(spec).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });
        watch::run(&mut machine, &mut debugger, &mut io, &items, decimal, print_count, dump_state);
    } else if run_flag {
        let result = debugger.run(&mut machine, &mut io);
        repl::report(&machine, result, print_count, dump_state);
    } else {
        repl::run(&mut machine, &mut debugger, &mut io, decimal, print_count, dump_state);
    }

    Ok(())
}
