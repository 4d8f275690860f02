use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use specimen_core::TypeDefKind;

/// Manifest contract version understood by this crate.
pub const MANIFEST_VERSION: &str = "1";

/// Root of a type manifest.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CatalogManifest {
    /// Manifest contract version.
    pub version: String,
    /// Declared user-defined types.
    #[serde(default)]
    pub types: Vec<TypeManifest>,
}

/// A user-defined type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TypeManifest {
    /// Unique type name.
    pub name: String,
    pub kind: TypeKind,
    /// Eligibility marker: the type may be built from its constructors.
    #[serde(default)]
    pub generatable: bool,
    /// Interfaces or abstract types this type can stand in for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<ConstructorManifest>,
}

/// Category of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Interface,
    Abstract,
    Concrete,
}

impl From<TypeKind> for TypeDefKind {
    fn from(value: TypeKind) -> Self {
        match value {
            TypeKind::Interface => TypeDefKind::Interface,
            TypeKind::Abstract => TypeDefKind::Abstract,
            TypeKind::Concrete => TypeDefKind::Concrete,
        }
    }
}

impl TypeKind {
    pub fn is_polymorphic(self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Abstract)
    }
}

/// Constructor with its ordered parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConstructorManifest {
    #[serde(default)]
    pub params: Vec<ParamManifest>,
}

/// Constructor parameter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ParamManifest {
    pub name: String,
    /// Type expression, e.g. `Map<String, List<Cart>>`.
    #[serde(rename = "type")]
    pub ty: String,
}
