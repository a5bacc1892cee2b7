//! Frame sinks: in-memory capture and streaming MP4 encoding through system `ffmpeg`.

pub mod ffmpeg;
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
