//! External process invocation.
//!
//! Every subprocess the driver starts goes through a [`Runner`], and every
//! completed process is reported as an explicit [`Outcome`] that the caller
//! has to turn into success or an error.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// One external command: program, arguments and optional working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command from `dir` instead of the driver's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    #[cfg(test)]
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.cwd {
            write!(f, "(cd {} && ", shell_quote(&dir.to_string_lossy()))?;
        }
        f.write_str(&shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        if self.cwd.is_some() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// How an external process ended.
#[must_use = "an Outcome must be checked; a failed command does not abort on its own"]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Exited with a non-zero status code.
    Failed { code: i32 },
    /// Terminated by a signal.
    Signaled { signal: i32 },
}

impl Outcome {
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => Outcome::Success,
            Some(code) => Outcome::Failed { code },
            None => Outcome::Signaled {
                signal: exit_signal(status),
            },
        }
    }

    /// Turn a failure into an error naming the command that produced it.
    pub fn check(self, inv: &Invocation) -> Result<()> {
        match self {
            Outcome::Success => Ok(()),
            Outcome::Failed { code } => bail!("`{inv}` failed with exit code {code}"),
            Outcome::Signaled { signal } => bail!("`{inv}` was terminated by signal {signal}"),
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> i32 {
    -1
}

/// Executes invocations.
///
/// An `Err` means the process could not be started at all (missing tool,
/// bad working directory); a completed process is always an `Ok(Outcome)`.
pub trait Runner {
    fn run(&mut self, inv: &Invocation) -> Result<Outcome>;

    /// Whether this runner actually touches the system.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Run `inv` and fail unless it succeeded.
pub fn run_checked(runner: &mut dyn Runner, inv: &Invocation) -> Result<()> {
    log::debug!("exec: {inv}");
    runner.run(inv)?.check(inv)
}

/// Spawns real processes with inherited stdio and waits for each one.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, inv: &Invocation) -> Result<Outcome> {
        if let Some(dir) = &inv.cwd {
            ensure_dir(dir)?;
        }
        let status = inv
            .to_command()
            .status()
            .with_context(|| format!("Spawning `{}`", inv.program))?;
        Ok(Outcome::from_status(status))
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("Working directory does not exist: {}", dir.display());
    }
    Ok(())
}

/// Prints every invocation instead of running it.
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl Runner for DryRunRunner {
    fn run(&mut self, inv: &Invocation) -> Result<Outcome> {
        println!("{inv}");
        Ok(Outcome::Success)
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
