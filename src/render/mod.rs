//! Timeline assembly: clips to frames, frames to a [`FrameSink`](crate::encode::FrameSink).

pub mod frame;
pub mod renderer;

pub use frame::FrameRGBA;
pub use renderer::{
    RenderPlan, RenderStats, RenderThreading, clip_frame_ranges, clip_progress, render_plan,
};
