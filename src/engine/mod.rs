//! Export engine: the pipeline state machine and its scratch space

pub mod pipeline;
pub mod scratch;

pub use pipeline::ExportPipeline;
pub use scratch::ScratchDir;
