//! Narration inputs and their split into timed on-screen segments.

pub mod bundle;
pub mod segment;
