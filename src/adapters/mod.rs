// Adapters - Concrete implementations of the ports

pub mod clock_playback;
pub mod fs_local;
pub mod probe_ffprobe;
pub mod process_tools;
pub mod shell_registry;
pub mod toml_settings;

pub use clock_playback::ClockPlayback;
pub use fs_local::FsLocalAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use process_tools::ProcessToolRunner;
pub use shell_registry::RegistryShellAdapter;
pub use toml_settings::TomlSettingsStore;
