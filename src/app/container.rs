use std::path::Path;
use std::sync::Arc;

use crate::adapters::{
    ClockPlayback, FfprobeAdapter, FsLocalAdapter, ProcessToolRunner, RegistryShellAdapter,
    TomlSettingsStore,
};
use crate::app::{
    export_interactor::ExportInteractor, session_interactor::Session,
    settings_interactor::SettingsInteractor, status::StatusBoard,
};
use crate::ports::{
    FsPort, ProbePort, SettingsPort, ShellIntegrationPort, StatusPort, ToolRunner,
};

pub trait AppContainer: Send + Sync {
    fn export_interactor(&self) -> Arc<ExportInteractor>;
    fn settings_interactor(&self) -> Arc<SettingsInteractor>;
    fn probe(&self) -> Arc<dyn ProbePort>;
    fn status(&self) -> Arc<StatusBoard>;
    fn new_session(&self) -> Session;
}

pub struct DefaultAppContainer {
    settings_port: Arc<dyn SettingsPort>,
    probe_port: Arc<dyn ProbePort>,
    status: Arc<StatusBoard>,
    export_interactor: Arc<ExportInteractor>,
    settings_interactor: Arc<SettingsInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters around the settings file at `settings_path`
    pub fn new(settings_path: &Path, echo_status: bool) -> Self {
        let settings_port: Arc<dyn SettingsPort> = Arc::new(TomlSettingsStore::new(settings_path));
        let runner: Arc<dyn ToolRunner> = Arc::new(ProcessToolRunner::new());
        let fs_port: Arc<dyn FsPort> = Arc::new(FsLocalAdapter::new());
        Self::with_ports(settings_port, runner, fs_port, echo_status)
    }

    /// Wire with caller-supplied settings, tool runner and filesystem
    pub fn with_ports(
        settings_port: Arc<dyn SettingsPort>,
        runner: Arc<dyn ToolRunner>,
        fs_port: Arc<dyn FsPort>,
        echo_status: bool,
    ) -> Self {
        let probe_port: Arc<dyn ProbePort> =
            Arc::new(FfprobeAdapter::new(Arc::clone(&settings_port)));
        let shell_port: Arc<dyn ShellIntegrationPort> = Arc::new(RegistryShellAdapter::new());
        let status = Arc::new(StatusBoard::new().with_echo(echo_status));

        let export_interactor = Arc::new(ExportInteractor::new(
            Arc::clone(&settings_port),
            runner,
            fs_port,
            Arc::clone(&status) as Arc<dyn StatusPort>,
        ));

        let settings_interactor = Arc::new(SettingsInteractor::new(
            Arc::clone(&settings_port),
            shell_port,
        ));

        Self {
            settings_port,
            probe_port,
            status,
            export_interactor,
            settings_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn export_interactor(&self) -> Arc<ExportInteractor> {
        Arc::clone(&self.export_interactor)
    }

    fn settings_interactor(&self) -> Arc<SettingsInteractor> {
        Arc::clone(&self.settings_interactor)
    }

    fn probe(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe_port)
    }

    fn status(&self) -> Arc<StatusBoard> {
        Arc::clone(&self.status)
    }

    fn new_session(&self) -> Session {
        Session::new(
            Arc::clone(&self.probe_port),
            Arc::clone(&self.settings_port),
            Arc::clone(&self.export_interactor),
            Arc::clone(&self.status) as Arc<dyn StatusPort>,
            Box::new(ClockPlayback::new()),
        )
    }
}
