//! Core contracts for Specimen.
//!
//! This crate defines the type descriptors the generator dispatches on, the
//! values it produces, and the catalog of user-defined types that may be
//! instantiated.

pub mod catalog;
pub mod error;
pub mod types;
pub mod value;

pub use catalog::{
    BoxError, CatalogBuilder, Constructor, Factory, Param, TypeCatalog, TypeDef, TypeDefKind,
};
pub use error::{CatalogError, Result};
pub use types::{LeafKind, TypeParseError, TypeRef};
pub use value::{Object, Value};
