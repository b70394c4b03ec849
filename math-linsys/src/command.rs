//! Interactive command menu
//!
//! Maps short aliases typed at the prompt to [`Command`]s and carries them
//! out against a pair of text streams, so the same loop drives a terminal or
//! an in-memory buffer.

use crate::dense::DenseMatrix;
use crate::error::Result;
use crate::io::{DEFAULT_INPUTS_DIR, choose_file, read_matrix_file, read_matrix_interactive};
use crate::solver::{SolverConfig, solve};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const BANNER: &str = "######################";

/// A menu command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Leave the menu loop
    Quit,
    /// Print the command list
    Help,
    /// Type a matrix in at the console
    CmdInput,
    /// Load a matrix from the inputs directory
    TxtInput,
    /// Anything not in the alias table
    Unknown,
}

/// Alias table plus the directory the file chooser lists.
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    aliases: BTreeMap<&'static str, Command>,
    inputs_dir: PathBuf,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new(DEFAULT_INPUTS_DIR)
    }
}

impl CommandInterpreter {
    /// Interpreter with the standard aliases whose `txt` command lists
    /// `inputs_dir`
    pub fn new<P: Into<PathBuf>>(inputs_dir: P) -> Self {
        let aliases = BTreeMap::from([
            ("q", Command::Quit),
            ("h", Command::Help),
            ("cmd", Command::CmdInput),
            ("txt", Command::TxtInput),
        ]);
        Self {
            aliases,
            inputs_dir: inputs_dir.into(),
        }
    }

    /// Directory listed by the file chooser
    pub fn inputs_dir(&self) -> &Path {
        &self.inputs_dir
    }

    /// Look up an alias; surrounding whitespace is ignored.
    pub fn parse(&self, alias: &str) -> Command {
        self.aliases
            .get(alias.trim())
            .copied()
            .unwrap_or(Command::Unknown)
    }

    /// One-line help text for a command
    pub fn description(cmd: Command) -> &'static str {
        match cmd {
            Command::Quit => "shuts down the program",
            Command::Help => "shows help",
            Command::CmdInput => "selects input from command line",
            Command::TxtInput => "selects input from text file",
            Command::Unknown => "",
        }
    }

    /// Prompt for and read the next command. Blank lines are skipped; end of
    /// input reads as [`Command::Quit`].
    pub fn read_command<R: BufRead, W: Write>(
        &self,
        out: &mut W,
        input: &mut R,
    ) -> Result<Command> {
        writeln!(out, "Enter command to execute...")?;
        out.flush()?;

        let mut line = String::new();
        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(Command::Quit);
            }
            if !line.trim().is_empty() {
                return Ok(self.parse(&line));
            }
        }
    }

    /// Print the alias table framed by banners, sorted by alias.
    pub fn print_help<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{BANNER}")?;
        writeln!(out, "AVAILABLE COMMANDS")?;
        writeln!(out, "{BANNER}")?;
        for (alias, cmd) in &self.aliases {
            writeln!(out, "{alias} - {}", Self::description(*cmd))?;
        }
        writeln!(out, "{BANNER}")?;
        Ok(())
    }

    /// Execute `cmd`. Returns `false` once the loop should stop.
    ///
    /// Failures while reading or solving a system are reported on `out` and
    /// do not end the loop; only errors writing to `out` are returned.
    pub fn process<R: BufRead, W: Write>(
        &self,
        out: &mut W,
        input: &mut R,
        cmd: Command,
        config: &SolverConfig,
    ) -> Result<bool> {
        match cmd {
            Command::Quit => {
                writeln!(out, "Shutting down...")?;
                return Ok(false);
            }
            Command::Help => self.print_help(out)?,
            Command::CmdInput | Command::TxtInput => {
                let solved = self
                    .read_matrix(out, input, cmd)
                    .and_then(|m| solve(&m, config));
                match solved {
                    Ok(report) => write!(out, "{report}")?,
                    Err(e) => {
                        log::debug!("{cmd:?} failed: {e}");
                        writeln!(out, "An error occurred: {e}")?;
                    }
                }
            }
            Command::Unknown => writeln!(out, "Unknown command entered")?,
        }
        out.flush()?;
        Ok(true)
    }

    fn read_matrix<R: BufRead, W: Write>(
        &self,
        out: &mut W,
        input: &mut R,
        cmd: Command,
    ) -> Result<DenseMatrix> {
        if cmd == Command::TxtInput {
            let path = choose_file(out, input, &self.inputs_dir)?;
            read_matrix_file(path)
        } else {
            read_matrix_interactive(out, input)
        }
    }

    /// Read and execute commands until `q` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &self,
        out: &mut W,
        input: &mut R,
        config: &SolverConfig,
    ) -> Result<()> {
        loop {
            let cmd = self.read_command(out, input)?;
            if !self.process(out, input, cmd, config)? {
                return Ok(());
            }
        }
    }
}
