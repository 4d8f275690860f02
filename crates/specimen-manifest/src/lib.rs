//! Declarative type manifests for Specimen.
//!
//! A manifest is a JSON document listing the user-defined types the generator
//! may target. It is validated against its JSON Schema, checked for dangling
//! references, and turned into an immutable [`specimen_core::TypeCatalog`].

pub mod errors;
pub mod load;
pub mod model;
pub mod validate;

pub use errors::{IssueSeverity, ManifestError, Result, ValidationIssue, ValidationReport};
pub use load::{build_catalog, load_catalog, load_catalog_from_path};
pub use model::{
    CatalogManifest, ConstructorManifest, MANIFEST_VERSION, ParamManifest, TypeKind, TypeManifest,
};
pub use validate::{
    ValidatedManifest, manifest_json_schema, validate_manifest, validate_manifest_json,
    validate_manifest_value,
};
