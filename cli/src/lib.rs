//! The menu-driven demo behind the `sole` binary.
//!
//! Reads one selection, runs the matching strategy's connection provider
//! against a batch of concurrent callers and prints one line per caller.

use sole::connection;
use sole::driver::{self, DriverConfig};
use sole::Strategy;
use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use thiserror::Error;

/// Errors surfaced to the user by the demo.
#[derive(Debug, Error)]
pub enum CliError {
  #[error("Failed to read selection: {0}")]
  Read(#[source] io::Error),

  #[error("Invalid selection {input:?}: {source}")]
  NotANumber {
    input: String,
    #[source]
    source: ParseIntError,
  },

  #[error("Failed to write output: {0}")]
  Write(#[source] io::Error),

  #[error(transparent)]
  Demo(#[from] sole::Error),
}

/// What the user picked from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
  Demo(Strategy),
  Quit,
}

/// Interprets one line of input. Any integer outside the menu means quit.
pub fn parse_selection(line: &str) -> Result<Selection, CliError> {
  let input = line.trim();
  let value: i64 = input.parse().map_err(|source| CliError::NotANumber {
    input: input.to_string(),
    source,
  })?;
  let strategy = u32::try_from(value)
    .ok()
    .and_then(|number| Strategy::try_from(number).ok());
  Ok(match strategy {
    Some(strategy) => Selection::Demo(strategy),
    None => Selection::Quit,
  })
}

pub fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
  writeln!(
    out,
    "Singleton Design Pattern Implementation. Select an option to execute!"
  )?;
  for strategy in Strategy::ALL {
    writeln!(out, "{}. {}", strategy.menu_number(), strategy.label())?;
  }
  writeln!(out, "{}. Exit", Strategy::ALL.len() + 1)
}

/// Runs one strategy's demo and prints its report.
pub fn run_demo<W: Write>(strategy: Strategy, callers: usize, out: &mut W) -> Result<(), CliError> {
  writeln!(out, "{}", strategy.banner()).map_err(CliError::Write)?;
  let sightings = driver::run(connection::provider(strategy), callers)?;
  for sighting in &sightings {
    writeln!(out, "{}", sighting).map_err(CliError::Write)?;
  }
  writeln!(
    out,
    "{} distinct instance(s) across {} callers",
    driver::distinct(&sightings),
    sightings.len()
  )
  .map_err(CliError::Write)
}

/// Prints the menu, reads one selection from `input` and acts on it.
pub fn run<R: BufRead, W: Write>(
  input: &mut R,
  out: &mut W,
  config: DriverConfig,
) -> Result<Selection, CliError> {
  print_menu(out).map_err(CliError::Write)?;
  out.flush().map_err(CliError::Write)?;

  let mut line = String::new();
  input.read_line(&mut line).map_err(CliError::Read)?;
  let selection = parse_selection(&line)?;
  tracing::debug!(?selection, callers = config.callers, "menu selection");

  match selection {
    Selection::Demo(strategy) => run_demo(strategy, config.callers, out)?,
    Selection::Quit => writeln!(out, "Quitting!").map_err(CliError::Write)?,
  }
  Ok(selection)
}
