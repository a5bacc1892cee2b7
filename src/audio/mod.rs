//! AudioMixer: narration plus an optional normalized music bed.

pub mod bed;
pub mod manifest;
pub mod mix;
pub mod mixer;

pub use mixer::{AudioMixer, MixOutcome};
