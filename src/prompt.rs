//! The interactive operator loop: ask for the parameters, run, print the
//! timings, offer a rerun with a different thread count and run count.

use std::convert::TryFrom;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::report::{ResultSink, TextSink};
use crate::workload::Mix;
use crate::{BenchmarkConfig, ListBenchError, PolicyKind, Result, TimingResult};

// Answer to a thread-count or runcount question.
enum Count {
    Valid(u32),
    // zero, negative or beyond u32
    Invalid,
    // end of input or not a number
    Stop,
}

/// A prompt-driven benchmark session over a pair of streams.
pub struct Session<R: BufRead, W: Write> {
    input: R,
    output: W,
    policy: PolicyKind,
    template: BenchmarkConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session for `policy`.
    ///
    /// Parameters the prompt never asks for (seed, random source) are taken
    /// from `template`.
    pub fn new(input: R, output: W, policy: PolicyKind, template: BenchmarkConfig) -> Session<R, W> {
        Session {
            input,
            output,
            policy,
            template,
        }
    }

    /// Runs the session until the operator quits or the input ends.
    ///
    /// `run` is called once per round with a validated config.
    ///
    /// # Errors
    ///
    /// It returns `ListBenchError::InvalidMix` (after telling the operator)
    /// if the fractions do not sum to 1.0, `ListBenchError::Input` for an
    /// unparsable answer to one of the first five questions, and any error
    /// `run` returns. An unparsable answer later on ends the session with
    /// `Ok(())`.
    pub fn run<F>(mut self, mut run: F) -> Result<()>
    where
        F: FnMut(&BenchmarkConfig) -> Result<TimingResult>,
    {
        let initial_size = self.require("Enter n (initial number of unique nodes): ")?;
        let operations = self.require("Enter m (number of operations): ")?;
        let member = self.require("Enter fraction of Member operations (0-1): ")?;
        let insert = self.require("Enter fraction of Insert operations (0-1): ")?;
        let delete = self.require("Enter fraction of Delete operations (0-1): ")?;

        let mix = Mix::new(member, insert, delete);
        if let Err(e) = mix.validate() {
            writeln!(self.output, "Error: Fractions must sum to 1.0")?;
            return Err(e);
        }

        loop {
            let threads = if self.policy.is_concurrent() {
                match self.count("Enter number of threads: ")? {
                    Count::Valid(threads) => threads,
                    Count::Invalid => {
                        writeln!(self.output, "Number of threads must be > 0")?;
                        continue;
                    }
                    Count::Stop => break,
                }
            } else {
                1
            };
            let runs = match self.count("Enter runcount (number of times to repeat experiment): ")? {
                Count::Valid(runs) => runs,
                Count::Invalid => {
                    writeln!(self.output, "Runcount must be > 0")?;
                    continue;
                }
                Count::Stop => break,
            };

            let config = BenchmarkConfig {
                initial_size,
                operations,
                mix,
                runs,
                threads,
                ..self.template.clone()
            };
            config.validate()?;
            let result = run(&config)?;
            writeln!(self.output)?;
            TextSink::new(&mut self.output).emit(self.policy, &result)?;

            let rerun = if self.policy.is_concurrent() {
                "2. Change thread count and runcount and rerun"
            } else {
                "2. Increase/change runcount and rerun"
            };
            writeln!(self.output, "\nDo you want to:\n1. Quit\n{}", rerun)?;
            match self.ask::<i64>("Enter choice: ") {
                Ok(Some(2)) => continue,
                Ok(Some(1)) => {
                    writeln!(self.output, "Exiting program.")?;
                    break;
                }
                Ok(None) | Err(ListBenchError::Input(_)) => break,
                Ok(Some(_)) => {
                    writeln!(self.output, "Invalid choice, exiting.")?;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // Inside the rerun loop an unreadable answer ends the session quietly.
    fn count(&mut self, question: &str) -> Result<Count> {
        let answer = match self.ask::<i64>(question) {
            Ok(Some(answer)) => answer,
            Ok(None) | Err(ListBenchError::Input(_)) => return Ok(Count::Stop),
            Err(e) => return Err(e),
        };
        match u32::try_from(answer) {
            Ok(count) if count > 0 => Ok(Count::Valid(count)),
            _ => Ok(Count::Invalid),
        }
    }

    fn require<T: FromStr>(&mut self, question: &str) -> Result<T> {
        self.ask(question)?
            .ok_or_else(|| ListBenchError::Input("unexpected end of input".to_owned()))
    }

    // `Ok(None)` on end of input.
    fn ask<T: FromStr>(&mut self, question: &str) -> Result<Option<T>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        answer
            .parse()
            .map(Some)
            .map_err(|_| ListBenchError::Input(format!("`{}`", answer)))
    }
}
