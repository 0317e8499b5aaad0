//! Export planning: which tools run, in which order, writing where

use std::path::{Path, PathBuf};

use crate::domain::model::{ExportJob, ExportStrategy, PipelineState, ToolConfig};

pub mod invocation;

use invocation::{FrameSequenceArgs, OptimizerArgs, ToolInvocation, TranscoderArgs};

/// File names inside a job's scratch directory
#[derive(Debug, Clone, PartialEq)]
pub struct ScratchLayout {
    pub root: PathBuf,
    pub intermediate: PathBuf,
    pub optimized: PathBuf,
    pub frames_dir: PathBuf,
}

impl ScratchLayout {
    pub const FRAME_EXTENSION: &'static str = "png";

    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            intermediate: root.join("Temp.gif"),
            optimized: root.join("TempOptimized.gif"),
            frames_dir: root.join("pngs"),
        }
    }

    /// Numbered still pattern understood by the transcoder
    pub fn frame_pattern(&self) -> PathBuf {
        self.frames_dir.join("temp_image%04d.png")
    }

    /// Glob of the stills, expanded by the image-sequence tool itself
    pub fn frame_glob(&self) -> PathBuf {
        self.frames_dir.join("*.png")
    }
}

/// What happens to the job when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Abort the whole export
    Abort,
    /// Warn and keep the previous candidate
    Degrade,
}

/// What a successful step leaves behind
#[derive(Debug, Clone, PartialEq)]
pub enum StepProduct {
    /// A single file that becomes the finalization candidate
    Candidate(PathBuf),
    /// Numbered stills in a directory
    Frames { directory: PathBuf, extension: &'static str },
}

/// One tool run within the plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub state: PipelineState,
    pub invocation: ToolInvocation,
    pub on_failure: OnFailure,
    pub product: StepProduct,
}

/// Ordered tool runs for one export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub strategy: ExportStrategy,
    pub steps: Vec<PlanStep>,
    pub layout: ScratchLayout,
}

impl ExportPlan {
    /// Directories the steps expect to exist before they run
    pub fn directories(&self) -> Vec<&Path> {
        self.steps
            .iter()
            .filter_map(|step| match &step.product {
                StepProduct::Frames { directory, .. } => Some(directory.as_path()),
                StepProduct::Candidate(_) => None,
            })
            .collect()
    }

    pub fn runs_optimizer(&self) -> bool {
        self.steps
            .iter()
            .any(|step| step.state == PipelineState::Optimizing)
    }
}

/// Builds export plans from a job and its tool configuration
pub struct ExportPlanner;

impl ExportPlanner {
    /// Plan the export; `optimize` is the optimizer switch after validation
    pub fn plan(
        job: &ExportJob,
        tools: &ToolConfig,
        optimize: bool,
        scratch_root: &Path,
    ) -> ExportPlan {
        let layout = ScratchLayout::new(scratch_root);
        let mut steps = Vec::new();

        match tools.strategy {
            ExportStrategy::Direct => steps.push(PlanStep {
                state: PipelineState::Transcoding,
                invocation: TranscoderArgs::direct(&tools.transcoder, job, &layout.intermediate),
                on_failure: OnFailure::Abort,
                product: StepProduct::Candidate(layout.intermediate.clone()),
            }),
            ExportStrategy::FrameSequence => {
                steps.push(PlanStep {
                    state: PipelineState::Transcoding,
                    invocation: TranscoderArgs::frame_sequence(
                        &tools.transcoder,
                        job,
                        &layout.frame_pattern(),
                    ),
                    on_failure: OnFailure::Abort,
                    product: StepProduct::Frames {
                        directory: layout.frames_dir.clone(),
                        extension: ScratchLayout::FRAME_EXTENSION,
                    },
                });
                steps.push(PlanStep {
                    state: PipelineState::FrameSequenceConversion,
                    invocation: FrameSequenceArgs::assemble(
                        &tools.frame_sequence_tool,
                        &layout.frame_glob(),
                        job.frame_rate,
                        &layout.intermediate,
                    ),
                    on_failure: OnFailure::Abort,
                    product: StepProduct::Candidate(layout.intermediate.clone()),
                });
            }
        }

        if optimize {
            steps.push(PlanStep {
                state: PipelineState::Optimizing,
                invocation: OptimizerArgs::optimize(
                    &tools.optimizer,
                    &layout.intermediate,
                    tools.colors,
                    &layout.optimized,
                ),
                on_failure: OnFailure::Degrade,
                product: StepProduct::Candidate(layout.optimized.clone()),
            });
        }

        ExportPlan {
            strategy: tools.strategy,
            steps,
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ToolKind, TrimSelector};
    use std::time::Duration;

    fn job() -> ExportJob {
        ExportJob {
            source: PathBuf::from("/videos/a.mp4"),
            range: TrimSelector::new(Duration::from_secs(4)).range(),
            frame_rate: 30,
            output: PathBuf::from("/videos/a.gif"),
        }
    }

    fn tools(strategy: ExportStrategy) -> ToolConfig {
        ToolConfig {
            transcoder: PathBuf::from("/bin/ffmpeg"),
            frame_sequence_tool: PathBuf::from("/bin/convert"),
            optimizer: PathBuf::from("/bin/gifsicle"),
            strategy,
            optimize: true,
            colors: 256,
        }
    }

    #[test]
    fn test_direct_plan_without_optimizer() {
        let plan = ExportPlanner::plan(&job(), &tools(ExportStrategy::Direct), false, Path::new("/s"));
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].invocation.tool, ToolKind::Transcoder);
        assert_eq!(
            plan.steps[0].product,
            StepProduct::Candidate(PathBuf::from("/s/Temp.gif"))
        );
        assert!(!plan.runs_optimizer());
        assert!(plan.directories().is_empty());
    }

    #[test]
    fn test_frame_sequence_plan_with_optimizer() {
        let plan = ExportPlanner::plan(
            &job(),
            &tools(ExportStrategy::FrameSequence),
            true,
            Path::new("/s"),
        );
        let order: Vec<PipelineState> = plan.steps.iter().map(|step| step.state).collect();
        assert_eq!(
            order,
            vec![
                PipelineState::Transcoding,
                PipelineState::FrameSequenceConversion,
                PipelineState::Optimizing,
            ]
        );
        assert_eq!(plan.steps[1].invocation.tool, ToolKind::FrameSequence);
        assert_eq!(plan.steps[2].on_failure, OnFailure::Degrade);
        assert_eq!(plan.directories(), vec![Path::new("/s/pngs")]);
    }
}
