use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::types::TypeRef;
use crate::value::{Object, Value};

/// Error type a constructor factory may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Builds an instance from generated arguments, in parameter order.
pub type Factory = Arc<dyn Fn(Vec<Value>) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// Category of a user-defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDefKind {
    Interface,
    Abstract,
    Concrete,
}

/// Named constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

/// Declared constructor: an ordered parameter list plus an optional factory.
///
/// Without a factory the constructor produces a [`Value::Object`] whose fields
/// pair each parameter name with its argument.
#[derive(Clone, Default)]
pub struct Constructor {
    params: Vec<Param>,
    factory: Option<Factory>,
}

impl Constructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(Vec<Value>) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn invoke(&self, type_name: &str, args: Vec<Value>) -> std::result::Result<Value, BoxError> {
        match &self.factory {
            Some(factory) => factory(args),
            None => {
                let fields = self
                    .params
                    .iter()
                    .map(|param| param.name.clone())
                    .zip(args)
                    .collect();
                Ok(Value::Object(Object::new(type_name, fields)))
            }
        }
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .field("factory", &self.factory.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Declaration of a user-defined type.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeDefKind,
    /// Eligibility marker: the type may be built from its constructors.
    pub generatable: bool,
    /// Direct supertypes (interfaces or abstract types).
    pub implements: Vec<String>,
    pub constructors: Vec<Constructor>,
}

impl TypeDef {
    fn new(name: impl Into<String>, kind: TypeDefKind) -> Self {
        Self {
            name: name.into(),
            kind,
            generatable: false,
            implements: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeDefKind::Interface)
    }

    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeDefKind::Abstract)
    }

    pub fn concrete(name: impl Into<String>) -> Self {
        Self::new(name, TypeDefKind::Concrete)
    }

    /// Attach the eligibility marker.
    pub fn generatable(mut self) -> Self {
        self.generatable = true;
        self
    }

    pub fn implements(mut self, supertype: impl Into<String>) -> Self {
        self.implements.push(supertype.into());
        self
    }

    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn is_polymorphic(&self) -> bool {
        matches!(self.kind, TypeDefKind::Interface | TypeDefKind::Abstract)
    }
}

/// Immutable registry of user-defined types.
///
/// Built once, then shared read-only with every engine that needs it.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: BTreeMap<String, TypeDef>,
}

impl TypeCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Declared types ordered by name.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether the type carries the eligibility marker.
    pub fn is_eligible(&self, name: &str) -> bool {
        self.types.get(name).is_some_and(|def| def.generatable)
    }

    /// Whether `candidate` is `target` or reaches it through `implements`.
    pub fn is_assignable(&self, candidate: &str, target: &str) -> bool {
        let mut queue = VecDeque::from([candidate]);
        let mut seen = BTreeSet::new();
        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(def) = self.types.get(current) {
                queue.extend(def.implements.iter().map(String::as_str));
            }
        }
        false
    }

    /// Concrete, eligible types assignable to `target`, ordered by name.
    pub fn list_eligible_implementations(&self, target: &str) -> Vec<&TypeDef> {
        self.types
            .values()
            .filter(|def| def.kind == TypeDefKind::Concrete && def.generatable)
            .filter(|def| self.is_assignable(&def.name, target))
            .collect()
    }
}

/// Collects type declarations and validates them into a [`TypeCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    types: Vec<TypeDef>,
}

impl CatalogBuilder {
    pub fn register(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    pub fn push(&mut self, def: TypeDef) {
        self.types.push(def);
    }

    /// Validate cross references and freeze the catalog.
    ///
    /// Checks:
    /// - type names are readable as type expressions and unique
    /// - every supertype is declared
    /// - every named parameter type is declared
    pub fn build(self) -> Result<TypeCatalog> {
        let mut types = BTreeMap::new();
        for def in self.types {
            if !TypeRef::is_declarable_name(&def.name) {
                return Err(CatalogError::ReservedName(def.name));
            }
            if types.contains_key(&def.name) {
                return Err(CatalogError::DuplicateType(def.name));
            }
            types.insert(def.name.clone(), def);
        }

        for def in types.values() {
            for supertype in &def.implements {
                if !types.contains_key(supertype) {
                    return Err(CatalogError::UnknownSupertype {
                        type_name: def.name.clone(),
                        supertype: supertype.clone(),
                    });
                }
            }

            for constructor in &def.constructors {
                for param in constructor.params() {
                    if let Some(missing) = param
                        .ty
                        .named_types()
                        .into_iter()
                        .find(|name| !types.contains_key(*name))
                    {
                        return Err(CatalogError::UnknownParamType {
                            type_name: def.name.clone(),
                            param: param.name.clone(),
                            referenced: missing.to_string(),
                        });
                    }
                }
            }
        }

        Ok(TypeCatalog { types })
    }
}
