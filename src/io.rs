use std::io::{self, BufRead, Write};

/// Abstracts the host streams `IN`/`OUT` talk to, so tests can feed canned input
/// and capture output without touching real stdin/stdout.
pub trait Io {
    /// Writes the `-> ` prompt and reads one line, stripping the trailing newline
    /// and truncating to `MAX_STRLEN` characters, per `IN`'s contract.
    fn read_line(&mut self) -> io::Result<String>;

    /// Writes one line (with a trailing newline) to the output stream.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// The default `Io` implementation: prompts and reads from stdin, writes to stdout.
pub struct StdIo;

impl Io for StdIo {
    fn read_line(&mut self) -> io::Result<String> {
        eprint!("-> ");
        io::stderr().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        line.truncate(crate::constants::MAX_STRLEN);
        Ok(line)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        println!("{}", line);
        Ok(())
    }
}

/// An in-memory `Io` used by tests: a queue of input lines and a log of output
/// lines written.
#[derive(Default)]
pub struct BufferIo {
    pub input: std::collections::VecDeque<String>,
    pub output: Vec<String>,
}

impl BufferIo {
    pub fn with_input<I: IntoIterator<Item = S>, S: Into<String>>(lines: I) -> BufferIo {
        BufferIo {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }
}

impl Io for BufferIo {
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = self.input.pop_front().unwrap_or_default();
        line.truncate(crate::constants::MAX_STRLEN);
        Ok(line)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }
}
