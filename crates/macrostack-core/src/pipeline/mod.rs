pub mod config;
mod ingest;
mod orchestrator;
mod resize;
mod types;

pub use ingest::load_frames;
pub use orchestrator::{run_stack, run_stack_reported, stack_decoded};
pub use resize::resize_to_canonical;
pub use types::{
    ChannelReporter, NoOpReporter, PipelineStage, ProgressEvent, ProgressReporter, ProgressSpan,
};
