//! Line-oriented operator console
//!
//! Generic over its reader and writer so sessions can be scripted in tests.

use crate::session::{parse_address_input, parse_amount, InputError};
use ethereum_types::{Address, U256};
use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Print `label` and read one line; `None` at end of input
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    /// Prompt until `parse` accepts the input
    pub fn prompt_parsed<T, F>(&mut self, label: &str, parse: F) -> io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, InputError>,
    {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => self.write_line(&format!("⚠️  {}", e))?,
            }
        }
    }

    pub fn prompt_address(&mut self, label: &str) -> io::Result<Option<Address>> {
        self.prompt_parsed(label, parse_address_input)
    }

    pub fn prompt_amount(&mut self, label: &str) -> io::Result<Option<U256>> {
        self.prompt_parsed(label, parse_amount)
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}
