// Application layer - Use case interactors

pub mod container;
pub mod export_interactor;
pub mod session_interactor;
pub mod settings_interactor;
pub mod status;

// Re-export interactors
pub use export_interactor::{ExportInteractor, ExportRequest};
pub use session_interactor::{PlaybackController, Session, SessionKey};
pub use settings_interactor::{SettingKey, SettingsInteractor};
pub use status::StatusBoard;
