mod cycle;
mod processor;
mod types;

pub use cycle::SpeckleCycle;
pub use processor::{ProcessorHandle, ProcessorOptions, SpeckleProcessor};
pub use types::{
    ArtifactSink, ChannelSink, CycleReport, CycleResult, NullSink, SinkEvent, WorkerState,
    WorkerStats,
};
