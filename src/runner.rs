use std::{path::Path, process::Command};

use git_info_errors::{CommandOutputSnafu, CommandSpawnSnafu, CommandStatusSnafu, Result};
use snafu::{ResultExt, ensure};
use tracing::debug;

//
// ──────────────────────────────────────────────────────────────────────────────
//  COMMAND EXECUTION
// ──────────────────────────────────────────────────────────────────────────────
//
// Every piece of repository metadata comes from a git subcommand run in the
// manifest's directory. The subcommand string goes through the platform shell
// (`git <subcommand>`), so quoting and word splitting behave the way they do
// on a terminal. Output is returned with surrounding whitespace trimmed.
//
// A failure to start, a non-zero exit or non-UTF-8 output is an error; there
// is no retry and no fallback value.
//

/// Runs version-control subcommands on behalf of the plugin.
pub trait CommandRunner {
    fn run(&self, cwd: &Path, subcommand: &str) -> Result<String>;
}

impl<F> CommandRunner for F
where
    F: Fn(&Path, &str) -> Result<String>,
{
    fn run(&self, cwd: &Path, subcommand: &str) -> Result<String> {
        self(cwd, subcommand)
    }
}

/// Runs the system `git` through the shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRunner;

impl CommandRunner for GitRunner {
    fn run(&self, cwd: &Path, subcommand: &str) -> Result<String> {
        run_git(cwd, subcommand)
    }
}

/// Execute `git <subcommand>` in `cwd` and return its trimmed stdout.
pub fn run_git(cwd: &Path, subcommand: &str) -> Result<String> {
    let line = format!("git {subcommand}");
    debug!(cwd = %cwd.display(), command = %line, "running git");

    let output = shell(&line)
        .current_dir(cwd)
        .output()
        .context(CommandSpawnSnafu {
            command: subcommand,
            cwd,
        })?;

    ensure!(
        output.status.success(),
        CommandStatusSnafu {
            command: subcommand,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim(),
        }
    );

    let stdout = String::from_utf8(output.stdout).context(CommandOutputSnafu {
        command: subcommand,
    })?;

    Ok(stdout.trim().to_string())
}

#[cfg(not(windows))]
fn shell(line: &str) -> Command {
    let mut command = Command::new("sh");
    command.args(["-c", line]);
    command
}

#[cfg(windows)]
fn shell(line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    // CREATE_NO_WINDOW
    const NO_WINDOW: u32 = 0x0800_0000;

    let mut command = Command::new("cmd");
    command.args(["/C", line]).creation_flags(NO_WINDOW);
    command
}
