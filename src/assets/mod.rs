//! External asset acquisition.
//!
//! Background images and music come from ordered [`chain::FallbackChain`]s of providers. A
//! provider either yields a usable local file or reports [`chain::Unavailable`]; the chain moves
//! on and never surfaces provider failures to the caller.

pub mod chain;
pub mod decode;
pub mod http;
pub mod images;
pub mod media;
pub mod music;
pub mod resolver;

pub use resolver::{AssetResolver, AssetSet};

#[cfg(test)]
#[path = "../../tests/unit/support/fake_http.rs"]
pub(crate) mod fake_http;
