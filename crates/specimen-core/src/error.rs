use thiserror::Error;

use crate::types::TypeParseError;

/// Errors raised while assembling a type catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two definitions share the same type name.
    #[error("duplicate type name: {0}")]
    DuplicateType(String),
    /// A type name that type expressions cannot refer to.
    #[error("type name '{0}' is reserved or not a valid type expression")]
    ReservedName(String),
    /// A type lists a supertype that is not declared.
    #[error("type '{type_name}' implements undeclared type '{supertype}'")]
    UnknownSupertype { type_name: String, supertype: String },
    /// A constructor parameter refers to a named type that is not declared.
    #[error("parameter '{param}' of '{type_name}' refers to undeclared type '{referenced}'")]
    UnknownParamType {
        type_name: String,
        param: String,
        referenced: String,
    },
    /// A type expression could not be parsed.
    #[error("invalid type expression '{expression}': {source}")]
    TypeExpression {
        expression: String,
        #[source]
        source: TypeParseError,
    },
}

/// Convenience alias for catalog results.
pub type Result<T> = std::result::Result<T, CatalogError>;
