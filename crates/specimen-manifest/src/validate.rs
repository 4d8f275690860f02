use std::collections::{BTreeMap, BTreeSet, VecDeque};

use jsonschema::JSONSchema;
use schemars::schema_for;
use serde_json::Value;

use specimen_core::TypeRef;

use crate::errors::{IssueSeverity, ManifestError, Result, ValidationIssue, ValidationReport};
use crate::model::{CatalogManifest, MANIFEST_VERSION, TypeKind, TypeManifest};

/// Validated manifest with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedManifest {
    pub manifest: CatalogManifest,
    pub warnings: Vec<ValidationIssue>,
}

/// JSON Schema describing the manifest contract.
pub fn manifest_json_schema() -> Result<Value> {
    Ok(serde_json::to_value(schema_for!(CatalogManifest))?)
}

/// Validate a manifest JSON document against a manifest JSON Schema.
pub fn validate_manifest_json(
    manifest_json: &Value,
    manifest_schema: &Value,
) -> Result<ValidationReport> {
    let compiled = JSONSchema::compile(manifest_schema)
        .map_err(|err| ManifestError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(manifest_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Check names, references and type expressions of a parsed manifest.
pub fn validate_manifest(manifest: &CatalogManifest) -> ValidationReport {
    let mut report = ValidationReport::default();

    if manifest.version != MANIFEST_VERSION {
        report.push(ValidationIssue::new(
            IssueSeverity::Error,
            "unsupported_version",
            "/version",
            format!(
                "manifest version '{}' is not supported (expected '{}')",
                manifest.version, MANIFEST_VERSION
            ),
            None,
        ));
    }

    let index = index_types(manifest, &mut report);

    for (idx, ty) in manifest.types.iter().enumerate() {
        let base_path = format!("/types/{idx}");
        validate_supertypes(ty, &base_path, &index, &mut report);
        validate_marker(ty, &base_path, &mut report);
        validate_constructors(ty, &base_path, &index, &mut report);
        if ty.kind.is_polymorphic() && !has_implementation(manifest, &index, &ty.name) {
            report.push(ValidationIssue::new(
                IssueSeverity::Warning,
                "no_implementations",
                base_path,
                format!("no generatable type implements '{}'", ty.name),
                Some("requests for this type will fail".to_string()),
            ));
        }
    }

    report
}

/// Validate the manifest end-to-end, returning structured issues on failure.
pub fn validate_manifest_value(manifest_json: &Value) -> std::result::Result<ValidatedManifest, ValidationReport> {
    let structural = match manifest_json_schema()
        .and_then(|schema| validate_manifest_json(manifest_json, &schema))
    {
        Ok(report) => report,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_validation_error",
                "/",
                err.to_string(),
                None,
            ));
            return Err(report);
        }
    };

    if !structural.is_ok() {
        return Err(structural);
    }

    let manifest: CatalogManifest = match serde_json::from_value(manifest_json.clone()) {
        Ok(manifest) => manifest,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "invalid_manifest_json",
                "/",
                err.to_string(),
                None,
            ));
            return Err(report);
        }
    };

    let semantic = validate_manifest(&manifest);
    if !semantic.is_ok() {
        return Err(semantic);
    }

    Ok(ValidatedManifest {
        manifest,
        warnings: semantic.warnings,
    })
}

fn index_types<'a>(
    manifest: &'a CatalogManifest,
    report: &mut ValidationReport,
) -> BTreeMap<&'a str, &'a TypeManifest> {
    let mut index = BTreeMap::new();
    for (idx, ty) in manifest.types.iter().enumerate() {
        let path = format!("/types/{idx}/name");
        if ty.name.trim().is_empty() {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "empty_name",
                path,
                "type name must not be empty",
                None,
            ));
            continue;
        }
        if !TypeRef::is_declarable_name(&ty.name) {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "reserved_type_name",
                path,
                format!("type name '{}' is reserved or not a valid type expression", ty.name),
                Some("leaf, container and placeholder names cannot be redeclared".to_string()),
            ));
            continue;
        }
        if index.insert(ty.name.as_str(), ty).is_some() {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_type",
                path,
                format!("type '{}' is declared more than once", ty.name),
                Some("merge the declarations into a single entry".to_string()),
            ));
        }
    }
    index
}

fn validate_supertypes(
    ty: &TypeManifest,
    base_path: &str,
    index: &BTreeMap<&str, &TypeManifest>,
    report: &mut ValidationReport,
) {
    for (idx, supertype) in ty.implements.iter().enumerate() {
        let path = format!("{base_path}/implements/{idx}");
        if supertype == &ty.name {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "self_supertype",
                path,
                format!("type '{}' cannot implement itself", ty.name),
                None,
            ));
        } else if !index.contains_key(supertype.as_str()) {
            report.push(ValidationIssue::new(
                IssueSeverity::Error,
                "unknown_supertype",
                path,
                format!("type '{}' implements undeclared type '{}'", ty.name, supertype),
                None,
            ));
        }
    }
}

fn validate_marker(ty: &TypeManifest, base_path: &str, report: &mut ValidationReport) {
    match ty.kind {
        TypeKind::Interface | TypeKind::Abstract => {
            if ty.generatable {
                report.push(ValidationIssue::new(
                    IssueSeverity::Warning,
                    "marker_on_polymorphic",
                    format!("{base_path}/generatable"),
                    format!("'{}' is polymorphic; its marker is ignored", ty.name),
                    None,
                ));
            }
            if !ty.constructors.is_empty() {
                report.push(ValidationIssue::new(
                    IssueSeverity::Warning,
                    "constructors_on_polymorphic",
                    format!("{base_path}/constructors"),
                    format!("'{}' is polymorphic; its constructors are never invoked", ty.name),
                    None,
                ));
            }
        }
        TypeKind::Concrete => {
            if ty.generatable && ty.constructors.is_empty() {
                report.push(ValidationIssue::new(
                    IssueSeverity::Warning,
                    "no_constructors",
                    base_path,
                    format!("'{}' is generatable but declares no constructors", ty.name),
                    Some("declare at least one constructor, even without params".to_string()),
                ));
            }
        }
    }
}

fn validate_constructors(
    ty: &TypeManifest,
    base_path: &str,
    index: &BTreeMap<&str, &TypeManifest>,
    report: &mut ValidationReport,
) {
    for (ctor_idx, constructor) in ty.constructors.iter().enumerate() {
        let mut names = BTreeSet::new();
        for (param_idx, param) in constructor.params.iter().enumerate() {
            let param_path = format!("{base_path}/constructors/{ctor_idx}/params/{param_idx}");
            if !names.insert(param.name.as_str()) {
                report.push(ValidationIssue::new(
                    IssueSeverity::Error,
                    "duplicate_param",
                    format!("{param_path}/name"),
                    format!("parameter '{}' is declared more than once", param.name),
                    None,
                ));
            }

            let parsed = match TypeRef::parse(&param.ty) {
                Ok(parsed) => parsed,
                Err(err) => {
                    report.push(ValidationIssue::new(
                        IssueSeverity::Error,
                        "invalid_type_expression",
                        format!("{param_path}/type"),
                        format!("invalid type expression '{}': {err}", param.ty),
                        None,
                    ));
                    continue;
                }
            };

            for name in parsed.named_types() {
                if !index.contains_key(name) {
                    report.push(ValidationIssue::new(
                        IssueSeverity::Error,
                        "unknown_param_type",
                        format!("{param_path}/type"),
                        format!("parameter '{}' refers to undeclared type '{name}'", param.name),
                        None,
                    ));
                }
            }
        }
    }
}

fn has_implementation(
    manifest: &CatalogManifest,
    index: &BTreeMap<&str, &TypeManifest>,
    target: &str,
) -> bool {
    manifest
        .types
        .iter()
        .filter(|ty| ty.kind == TypeKind::Concrete && ty.generatable)
        .any(|ty| reaches(index, &ty.name, target))
}

fn reaches(index: &BTreeMap<&str, &TypeManifest>, from: &str, target: &str) -> bool {
    let mut queue = VecDeque::from([from]);
    let mut seen = BTreeSet::new();
    while let Some(current) = queue.pop_front() {
        if current == target {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(ty) = index.get(current) {
            queue.extend(ty.implements.iter().map(String::as_str));
        }
    }
    false
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
