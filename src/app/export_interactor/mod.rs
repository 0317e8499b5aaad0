// Export interactor - Orchestrates the trim-to-gif export use case

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::ExportError;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::engine::ExportPipeline;
use crate::error::GifferResult;
use crate::ports::*;

/// Status text shown after a successful export
pub const FINISHED_MESSAGE: &str = "Finished Exporting";

/// Busy indicator label for the whole export
pub const BUSY_LABEL: &str = "Exporting";

/// Everything needed to export one range of one source
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub source: PathBuf,
    pub range: TrimRange,
    pub frame_rate: u32,
    /// Save-as destination; derived from settings when absent
    pub output: Option<PathBuf>,
    pub overrides: ExportOverrides,
}

impl ExportRequest {
    pub fn new(source: impl Into<PathBuf>, range: TrimRange, frame_rate: u32) -> Self {
        Self {
            source: source.into(),
            range,
            frame_rate,
            output: None,
            overrides: ExportOverrides::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ExportOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Interactor for the export use case
pub struct ExportInteractor {
    settings: Arc<dyn SettingsPort>,
    runner: Arc<dyn ToolRunner>,
    fs: Arc<dyn FsPort>,
    status: Arc<dyn StatusPort>,
}

impl ExportInteractor {
    /// Create new export interactor with injected ports
    pub fn new(
        settings: Arc<dyn SettingsPort>,
        runner: Arc<dyn ToolRunner>,
        fs: Arc<dyn FsPort>,
        status: Arc<dyn StatusPort>,
    ) -> Self {
        Self {
            settings,
            runner,
            fs,
            status,
        }
    }

    /// Where an export of `source` lands without a save-as path
    pub fn default_output(&self, source: &std::path::Path) -> GifferResult<PathBuf> {
        let settings = self.settings.load()?;
        Ok(OutputPathResolver::derive(source, settings.export_directory.as_deref())
            .ok_or(ExportError::NoMedia)?)
    }

    /// Run the export, reporting progress and outcome on the status port
    pub fn execute(&self, request: &ExportRequest) -> GifferResult<ExportReport> {
        let settings = match self.settings.load() {
            Ok(settings) => settings,
            Err(e) => {
                self.status.show(StatusLevel::Error, &e.to_string());
                return Err(e.into());
            }
        };
        let tools = ExportStrategySelector::select(&settings, &request.overrides);

        let output = match &request.output {
            Some(path) => OutputPathResolver::with_extension(path),
            None => match OutputPathResolver::derive(&request.source, settings.export_directory.as_deref()) {
                Some(path) => path,
                None => {
                    let e = ExportError::NoMedia;
                    self.status.show(StatusLevel::Error, &e.to_string());
                    return Err(e.into());
                }
            },
        };

        let job = ExportJob {
            source: request.source.clone(),
            range: request.range,
            frame_rate: request.frame_rate,
            output,
        };
        info!(source = %job.source.display(), output = %job.output.display(), "Export requested");

        self.status.begin_busy(BUSY_LABEL);
        let result = ExportPipeline::new(self.runner.as_ref(), self.fs.as_ref()).run(&job, &tools);
        self.status.end_busy();

        match result {
            Ok(report) => {
                for warning in &report.warnings {
                    self.status.show(StatusLevel::Warning, &warning.to_string());
                }
                if report.warnings.is_empty() {
                    self.status.finished(FINISHED_MESSAGE);
                }
                Ok(report)
            }
            Err(e) => {
                self.status.show(StatusLevel::Error, &e.to_string());
                Err(e.into())
            }
        }
    }
}
