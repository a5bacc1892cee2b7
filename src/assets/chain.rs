/// Why a provider could not supply a result. Always non-fatal.
#[derive(thiserror::Error, Debug)]
pub enum Unavailable {
    #[error("{0} credential is not configured")]
    MissingCredential(&'static str),

    #[error("no results: {0}")]
    NoResults(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("disabled by configuration")]
    Disabled,
}

impl From<std::io::Error> for Unavailable {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// One tier of a fallback chain.
pub trait Provider<Req, Out>: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn provide(&self, req: &Req) -> Result<Out, Unavailable>;
}

/// A value together with the tier that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<Out> {
    pub provider: String,
    pub value: Out,
}

/// Ordered providers tried in sequence until one succeeds.
pub struct FallbackChain<Req, Out> {
    providers: Vec<Box<dyn Provider<Req, Out>>>,
}

impl<Req, Out> Default for FallbackChain<Req, Out> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl<Req, Out> FallbackChain<Req, Out> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl Provider<Req, Out> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn Provider<Req, Out>>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Try each provider in order. `None` means every tier was unavailable.
    pub fn resolve(&self, req: &Req) -> Option<Resolved<Out>> {
        for provider in &self.providers {
            match provider.provide(req) {
                Ok(value) => {
                    tracing::info!(provider = provider.name(), "asset tier succeeded");
                    return Some(Resolved {
                        provider: provider.name().to_string(),
                        value,
                    });
                }
                Err(reason) => {
                    tracing::warn!(provider = provider.name(), %reason, "asset tier unavailable");
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/chain.rs"]
mod tests;
