use std::path::Path;

use serde_json::Value;

use specimen_core::{CatalogError, Constructor, TypeCatalog, TypeDef, TypeRef};

use crate::errors::{ManifestError, Result};
use crate::model::{CatalogManifest, ConstructorManifest, TypeManifest};
use crate::validate::validate_manifest_value;

/// Turn a parsed manifest into a catalog.
///
/// Runs the catalog's own reference checks but not the manifest validation;
/// use [`load_catalog`] for untrusted input.
pub fn build_catalog(manifest: &CatalogManifest) -> Result<TypeCatalog> {
    let mut builder = TypeCatalog::builder();
    for ty in &manifest.types {
        builder.push(build_type(ty)?);
    }
    Ok(builder.build()?)
}

/// Validate a manifest document and build its catalog.
pub fn load_catalog(manifest_json: &Value) -> Result<TypeCatalog> {
    let validated = validate_manifest_value(manifest_json).map_err(ManifestError::Invalid)?;
    build_catalog(&validated.manifest)
}

/// Read, validate and build a manifest stored on disk.
pub fn load_catalog_from_path(path: &Path) -> Result<TypeCatalog> {
    let raw = std::fs::read_to_string(path)?;
    let manifest_json: Value = serde_json::from_str(&raw)?;
    load_catalog(&manifest_json)
}

fn build_type(ty: &TypeManifest) -> Result<TypeDef> {
    // Polymorphic types are never constructed directly.
    let constructors = if ty.kind.is_polymorphic() {
        Vec::new()
    } else {
        ty.constructors
            .iter()
            .map(build_constructor)
            .collect::<Result<Vec<_>>>()?
    };

    Ok(TypeDef {
        name: ty.name.clone(),
        kind: ty.kind.into(),
        generatable: ty.generatable,
        implements: ty.implements.clone(),
        constructors,
    })
}

fn build_constructor(constructor: &ConstructorManifest) -> Result<Constructor> {
    constructor
        .params
        .iter()
        .try_fold(Constructor::new(), |ctor, param| {
            let ty = TypeRef::parse(&param.ty).map_err(|source| CatalogError::TypeExpression {
                expression: param.ty.clone(),
                source,
            })?;
            Ok(ctor.param(param.name.clone(), ty))
        })
}
