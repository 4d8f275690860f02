use specimen_core::BoxError;
use thiserror::Error;

/// Failures raised inside the recursion tree.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("type '{0}' is not marked generatable")]
    NotEligible(String),
    #[error("no generatable implementations found for polymorphic type '{0}'")]
    NoImplementationFound(String),
    #[error("no constructors declared for type '{0}'")]
    NoConstructorAvailable(String),
    #[error("constructor #{constructor} of '{type_name}' failed: {source}")]
    ConstructionFailed {
        type_name: String,
        constructor: usize,
        #[source]
        source: BoxError,
    },
    #[error("unsupported request: {0}")]
    Unsupported(String),
}

/// Error reported by the engine entry points: the requested root type and
/// the failure that aborted its generation.
#[derive(Debug, Error)]
#[error("failed to generate value for type: {root}")]
pub struct GenerateError {
    pub root: String,
    #[source]
    pub source: GenerationError,
}

impl GenerateError {
    pub fn cause(&self) -> &GenerationError {
        &self.source
    }
}
