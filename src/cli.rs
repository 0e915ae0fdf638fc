//! Command-line adapter.
//!
//! A driving adapter over the service layer: named processes are registered
//! up front, the parser restricts the `process` argument to those names and
//! dispatches to the matching function.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Arg, Command};
use colored::Colorize;
use tracing::debug;

use crate::errors::Error;

const PROCESS_ARG: &str = "process";

/// A service function runnable from the command line.
pub type Process = Box<dyn FnMut() -> Result<()>>;

/// Dispatches a `process` argument to a registered service function.
pub struct CommandLineInterface {
    name: String,
    processes: BTreeMap<String, Process>,
}

impl CommandLineInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            processes: BTreeMap::new(),
        }
    }

    /// Register a named process. Names are matched case-insensitively.
    pub fn register(&mut self, name: &str, process: impl FnMut() -> Result<()> + 'static) {
        self.processes
            .insert(name.to_lowercase(), Box::new(process));
    }

    /// Names of the registered processes.
    pub fn processes(&self) -> Vec<&str> {
        self.processes.keys().map(String::as_str).collect()
    }

    /// Parse `argv` and run the selected process.
    pub fn run<I>(&mut self, argv: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let names: Vec<String> = self.processes.keys().cloned().collect();
        let command = Command::new(self.name.clone()).arg(
            Arg::new(PROCESS_ARG)
                .required(true)
                .value_parser(PossibleValuesParser::new(names))
                .help("process to run"),
        );

        let matches = command.try_get_matches_from(argv)?;
        let selected = matches
            .get_one::<String>(PROCESS_ARG)
            .ok_or_else(|| Error::NotFound(PROCESS_ARG.to_string()))?
            .to_lowercase();
        self.execute(&selected)
    }

    /// Run a registered process by name.
    pub fn execute(&mut self, name: &str) -> Result<()> {
        debug!(process = name, "executing process");
        let process = self
            .processes
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        process()
    }
}

/// Report a failure on stderr, colorized for terminals.
pub fn report_failure(failure: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), failure);
}
