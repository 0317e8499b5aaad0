//! Export pipeline state machine
//!
//! ```text
//! Idle -> ValidatingTools -> Transcoding -> [FrameSequenceConversion]
//!      -> [Optimizing] -> Finalizing -> Idle
//! ```
//!
//! Any state other than `Idle` can fall into `Aborted`. Every tool runs on
//! the calling thread and blocks it until the child exits; there is no
//! cancellation once a tool has started.

use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::domain::errors::{ExportError, ExportWarning, ToolError};
use crate::domain::model::*;
use crate::domain::rules::ToolValidator;
use crate::planner::{ExportPlan, ExportPlanner, OnFailure, PlanStep, StepProduct};
use crate::ports::{FsPort, ToolRunner};

/// Drives one export job through the pipeline states
pub struct ExportPipeline<'a> {
    runner: &'a dyn ToolRunner,
    fs: &'a dyn FsPort,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(runner: &'a dyn ToolRunner, fs: &'a dyn FsPort) -> Self {
        Self {
            runner,
            fs,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state visited so far, in order
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run `job` to completion or abort
    pub fn run(&mut self, job: &ExportJob, tools: &ToolConfig) -> Result<ExportReport, ExportError> {
        self.transition(PipelineState::ValidatingTools)?;
        info!(
            source = %job.source.display(),
            output = %job.output.display(),
            range = %job.range,
            strategy = ?tools.strategy,
            "Starting export"
        );

        let mut warnings = Vec::new();
        let optimize = match self.validate_tools(tools, &mut warnings) {
            Ok(optimize) => optimize,
            Err(e) => return Err(self.abort(e)),
        };

        let scratch = match self.fs.create_scratch_dir() {
            Ok(scratch) => scratch,
            Err(e) => return Err(self.abort(ExportError::Scratch(e))),
        };
        let scratch_path = scratch.path().to_path_buf();
        debug!(scratch = %scratch_path.display(), "Created scratch directory");

        let plan = ExportPlanner::plan(job, tools, optimize, &scratch_path);
        debug!(
            steps = plan.steps.len(),
            optimizer = plan.runs_optimizer(),
            intermediate = %plan.layout.intermediate.display(),
            "Planned export"
        );
        let outcome = self.execute(&plan, job, &mut warnings);

        if let Err(e) = scratch.close() {
            warn!(scratch = %scratch_path.display(), error = %e, "Failed to remove scratch directory");
            warnings.push(ExportWarning::ScratchCleanup {
                path: scratch_path,
                reason: e.to_string(),
            });
        }

        let optimized = match outcome {
            Ok(optimized) => optimized,
            Err(e) => return Err(self.abort(e)),
        };
        self.transition(PipelineState::Idle)?;

        info!(output = %job.output.display(), optimized, "Export finished");
        Ok(ExportReport {
            output: job.output.clone(),
            range: job.range,
            strategy: plan.strategy,
            optimized,
            warnings,
            states: self.history.clone(),
            finished_at: Local::now(),
        })
    }

    /// Check tool paths; returns whether the optimizer will run
    fn validate_tools(
        &self,
        tools: &ToolConfig,
        warnings: &mut Vec<ExportWarning>,
    ) -> Result<bool, ExportError> {
        let mut required = vec![ToolKind::Transcoder];
        if tools.strategy == ExportStrategy::FrameSequence {
            required.push(ToolKind::FrameSequence);
        }

        for tool in required {
            let path = tools.path(tool);
            if !ToolValidator::is_present(path) {
                return Err(ExportError::MissingTool {
                    tool,
                    path: path.to_path_buf(),
                });
            }
        }

        if !tools.optimize {
            return Ok(false);
        }
        if ToolValidator::is_present(&tools.optimizer) {
            return Ok(true);
        }

        let warning = ExportWarning::OptimizerMissing {
            tool: ToolKind::Optimizer,
            path: tools.optimizer.clone(),
        };
        warn!("{}", warning);
        warnings.push(warning);
        Ok(false)
    }

    /// Run the plan's steps and move the result into place
    fn execute(
        &mut self,
        plan: &ExportPlan,
        job: &ExportJob,
        warnings: &mut Vec<ExportWarning>,
    ) -> Result<bool, ExportError> {
        for directory in plan.directories() {
            self.fs
                .create_directory(directory)
                .map_err(ExportError::Scratch)?;
        }

        let mut candidate: Option<PathBuf> = None;
        let mut optimized = false;

        for step in &plan.steps {
            self.transition(step.state)?;
            match self.run_step(step) {
                Ok(()) => {
                    if let StepProduct::Candidate(path) = &step.product {
                        candidate = Some(path.clone());
                        optimized = step.state == PipelineState::Optimizing;
                    }
                }
                Err(e) if step.on_failure == OnFailure::Degrade => {
                    let warning = ExportWarning::OptimizerFailed {
                        tool: step.invocation.tool,
                        reason: e.to_string(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
                Err(e) => return Err(e),
            }
        }

        self.transition(PipelineState::Finalizing)?;
        let candidate = candidate.ok_or(ExportError::NothingToFinalize)?;

        // Delete-then-move: a crash in between loses the old file
        self.fs
            .replace_file(&candidate, &job.output)
            .map_err(|source| ExportError::Destination {
                path: job.output.clone(),
                source,
            })?;

        Ok(optimized)
    }

    fn run_step(&self, step: &PlanStep) -> Result<(), ExportError> {
        let tool = step.invocation.tool;
        info!(%tool, command = %step.invocation.display_command(), "Running tool");

        let outcome = self
            .runner
            .run(&step.invocation)
            .map_err(|source| ExportError::StepFailed { tool, source })?;
        debug!(%tool, elapsed_ms = outcome.elapsed.as_millis() as u64, "Tool finished");

        match &step.product {
            StepProduct::Candidate(path) => {
                if !self.fs.file_exists(path) {
                    return Err(ExportError::StepFailed {
                        tool,
                        source: ToolError::MissingOutput {
                            program: tool.to_string(),
                            expected: path.clone(),
                        },
                    });
                }
            }
            StepProduct::Frames {
                directory,
                extension,
            } => {
                let frames = self
                    .fs
                    .count_files(directory, extension)
                    .map_err(ExportError::Scratch)?;
                if frames == 0 {
                    return Err(ExportError::NoFrames {
                        tool,
                        directory: directory.clone(),
                    });
                }
                debug!(%tool, frames, "Frame sequence written");
            }
        }
        Ok(())
    }

    fn transition(&mut self, next: PipelineState) -> Result<(), ExportError> {
        if !self.state.can_transition_to(next) {
            return Err(ExportError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, to = ?next, "Pipeline transition");
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    fn abort(&mut self, error: ExportError) -> ExportError {
        if self.state.can_transition_to(PipelineState::Aborted) {
            self.state = PipelineState::Aborted;
            self.history.push(PipelineState::Aborted);
        }
        error!(error = %error, "Export aborted");
        error
    }
}
