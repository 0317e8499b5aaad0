//! Child-process execution adapter
//!
//! Runs the external tools synchronously with an argument vector. The child
//! inherits the parent's environment untouched and gets a null stdin so a
//! tool can never sit waiting for an interactive answer.

use std::ffi::OsStr;
use std::process::{Command, Output, Stdio};
use std::time::Instant;

use tracing::{debug, trace};

use crate::domain::errors::ToolError;
use crate::planner::invocation::ToolInvocation;
use crate::ports::{ToolOutcome, ToolRunner};

/// Lines of stderr kept for error reports
const STDERR_TAIL_LINES: usize = 12;

/// Build a command that does not flash a console window on Windows
pub fn hidden_command<S: AsRef<OsStr>>(program: S) -> Command {
    let mut cmd = Command::new(program);
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

/// Run `program` with `args` and collect its output, whatever the exit status
pub fn capture<I, S>(program: &OsStr, args: I) -> Result<Output, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    hidden_command(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ToolError::Launch {
            program: program.to_string_lossy().into_owned(),
            source,
        })
}

/// Last `lines` lines of a tool's stderr
pub fn tail(text: &str, lines: usize) -> String {
    let collected: Vec<&str> = text.lines().rev().take(lines).collect();
    collected.into_iter().rev().collect::<Vec<_>>().join("\n")
}

/// Runs tools as blocking child processes
#[derive(Debug, Default, Clone)]
pub struct ProcessToolRunner;

impl ProcessToolRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutcome, ToolError> {
        let started = Instant::now();
        let program = invocation.program.display().to_string();
        debug!(tool = %invocation.tool, program = %program, "Spawning tool");

        let output = capture(invocation.program.as_os_str(), invocation.argv())?;
        let stderr_tail = tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL_LINES);
        trace!(tool = %invocation.tool, stderr = %stderr_tail, "Tool stderr");

        if !output.status.success() {
            return Err(ToolError::NonZeroExit {
                program,
                code: output.status.code(),
                stderr_tail,
            });
        }

        Ok(ToolOutcome {
            elapsed: started.elapsed(),
            stderr_tail,
        })
    }
}
