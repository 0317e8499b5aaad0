//! Structured argument lists for the external tools
//!
//! Every tool call is an ordered list of `(flag, value)` pairs handed to the
//! child process directly, never a shell string, so paths with spaces or
//! quotes reach the tool unchanged.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::domain::model::{ExportJob, ToolKind};
use crate::domain::rules::FrameTiming;
use crate::utils::time::format_seconds;

/// One `(flag, value)` pair; either side may be absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArg {
    pub flag: Option<String>,
    pub value: Option<OsString>,
}

/// A fully described tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool: ToolKind,
    pub program: PathBuf,
    pub args: Vec<ToolArg>,
    /// File the tool is expected to leave behind, when it writes exactly one
    pub expected_output: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(tool: ToolKind, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            expected_output: None,
        }
    }

    /// Bare switch such as `-y`
    pub fn flag(mut self, flag: &str) -> Self {
        self.args.push(ToolArg {
            flag: Some(flag.to_string()),
            value: None,
        });
        self
    }

    /// Switch followed by its value
    pub fn option(mut self, flag: &str, value: impl AsRef<OsStr>) -> Self {
        self.args.push(ToolArg {
            flag: Some(flag.to_string()),
            value: Some(value.as_ref().to_os_string()),
        });
        self
    }

    /// Positional argument
    pub fn value(mut self, value: impl AsRef<OsStr>) -> Self {
        self.args.push(ToolArg {
            flag: None,
            value: Some(value.as_ref().to_os_string()),
        });
        self
    }

    /// Positional output file, also recorded as the expected product
    pub fn output_file(self, path: &Path) -> Self {
        self.value(path).expecting(path)
    }

    /// Record the file the tool should produce without adding an argument
    pub fn expecting(mut self, path: &Path) -> Self {
        self.expected_output = Some(path.to_path_buf());
        self
    }

    /// Flattened argv, program excluded
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(self.args.len() * 2);
        for arg in &self.args {
            if let Some(flag) = &arg.flag {
                argv.push(OsString::from(flag));
            }
            if let Some(value) = &arg.value {
                argv.push(value.clone());
            }
        }
        argv
    }

    /// Human readable rendering for logs only
    pub fn display_command(&self) -> String {
        let mut rendered = format!("\"{}\"", self.program.display());
        for arg in self.argv() {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                rendered.push_str(&format!(" \"{}\"", arg));
            } else {
                rendered.push(' ');
                rendered.push_str(&arg);
            }
        }
        rendered
    }
}

/// Palette filter used for direct GIF encoding
fn palette_filter(frame_rate: u32) -> String {
    format!(
        "[0:v] fps={},split [a][b];[a] palettegen [p];[b][p] paletteuse",
        frame_rate
    )
}

/// Transcoder calls
pub struct TranscoderArgs;

impl TranscoderArgs {
    fn trimmed_input(program: &Path, job: &ExportJob) -> ToolInvocation {
        ToolInvocation::new(ToolKind::Transcoder, program)
            .flag("-y")
            .option("-ss", format_seconds(job.range.start()))
            .option("-t", format_seconds(job.range.length()))
            .option("-i", &job.source)
    }

    /// Trim and encode straight to an animated image
    pub fn direct(program: &Path, job: &ExportJob, output: &Path) -> ToolInvocation {
        Self::trimmed_input(program, job)
            .option("-filter_complex", palette_filter(job.frame_rate))
            .output_file(output)
    }

    /// Trim and write numbered stills matching `pattern`
    pub fn frame_sequence(program: &Path, job: &ExportJob, pattern: &Path) -> ToolInvocation {
        Self::trimmed_input(program, job).value(pattern)
    }
}

/// Image-sequence tool calls
pub struct FrameSequenceArgs;

impl FrameSequenceArgs {
    /// Assemble every still matching `frames_glob` into one animated image
    pub fn assemble(
        program: &Path,
        frames_glob: &Path,
        frame_rate: u32,
        output: &Path,
    ) -> ToolInvocation {
        ToolInvocation::new(ToolKind::FrameSequence, program)
            .option("-background", "gray")
            .option("-alpha", "remove")
            .option("-alpha", "off")
            .option("-delay", FrameTiming::sequence_delay(frame_rate))
            .value(frames_glob)
            .output_file(output)
    }
}

/// Optimizer calls
pub struct OptimizerArgs;

impl OptimizerArgs {
    /// Re-encode `input` with `colors` palette entries into `output`
    pub fn optimize(program: &Path, input: &Path, colors: u16, output: &Path) -> ToolInvocation {
        ToolInvocation::new(ToolKind::Optimizer, program)
            .option("-i", input)
            .flag("-O3")
            .option("--colors", colors.to_string())
            .option("-o", output)
            .expecting(output)
    }
}
