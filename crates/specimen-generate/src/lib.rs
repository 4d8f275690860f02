//! Recursive random instance generation for Specimen.
//!
//! Given a [`specimen_core::TypeRef`] and a [`specimen_core::TypeCatalog`],
//! the engine produces a randomly populated value of that type: leaves come
//! from pluggable generators, containers and user-defined types are built
//! recursively, and a depth bound keeps self-referential types finite.

pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
mod structural;

pub use engine::GenerationEngine;
pub use errors::{GenerateError, GenerationError};
pub use generators::{LeafGenerator, LeafRegistry};
pub use model::{
    ConstructorPolicy, GenerateOptions, GenerationReport, MAX_COLLECTION_SIZE,
    MAX_RECURSION_DEPTH, MAX_STRING_LENGTH,
};
