//! EffectPipeline: one [`clip::ComposedClip`] per segment.

pub mod clip;
pub mod pipeline;

pub use clip::{BackgroundLayer, ComposedClip, OverlayLayer};
pub use pipeline::compose_segments;
