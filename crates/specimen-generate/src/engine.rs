use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use specimen_core::{LeafKind, TypeCatalog, TypeDef, TypeRef, Value};

use crate::errors::{GenerateError, GenerationError};
use crate::generators::{LeafGenerator, LeafRegistry};
use crate::model::{GenerateOptions, GenerationReport};

/// Entry point for generating random instances of catalog types.
///
/// The engine owns its random source, so two engines built from the same
/// catalog, leaf registry and options produce identical sequences of values.
#[derive(Debug)]
pub struct GenerationEngine {
    catalog: Arc<TypeCatalog>,
    leaves: LeafRegistry,
    options: GenerateOptions,
    rng: ChaCha8Rng,
}

impl GenerationEngine {
    pub fn new(catalog: Arc<TypeCatalog>, options: GenerateOptions) -> Self {
        let leaves = LeafRegistry::with_string_length(options.max_string_length);
        let rng = ChaCha8Rng::seed_from_u64(options.seed);
        Self {
            catalog,
            leaves,
            options,
            rng,
        }
    }

    /// Replace the leaf generators consulted before any other strategy.
    pub fn with_leaf_registry(mut self, leaves: LeafRegistry) -> Self {
        self.leaves = leaves;
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn generate(&mut self, root: &TypeRef) -> Result<Value, GenerateError> {
        self.generate_with_report(root).map(|(value, _)| value)
    }

    pub fn generate_named(&mut self, name: &str) -> Result<Value, GenerateError> {
        self.generate(&TypeRef::named(name))
    }

    /// Generate `count` values of the same root type, in order.
    pub fn generate_many(&mut self, root: &TypeRef, count: usize) -> Result<Vec<Value>, GenerateError> {
        (0..count).map(|_| self.generate(root)).collect()
    }

    pub fn generate_with_report(
        &mut self,
        root: &TypeRef,
    ) -> Result<(Value, GenerationReport), GenerateError> {
        let start = Instant::now();
        let root_name = root.to_string();
        let mut report = GenerationReport::new(root_name.clone());

        info!(root = %root_name, "generation started");

        let mut ctx = GenerationContext {
            catalog: &self.catalog,
            leaves: &self.leaves,
            options: &self.options,
            rng: &mut self.rng,
            report: &mut report,
        };

        match ctx.generate_value(root, 0) {
            Ok(value) => {
                info!(
                    root = %root_name,
                    values = report.values_generated,
                    max_depth = report.max_depth_reached,
                    truncated = report.truncated_branches,
                    duration_us = start.elapsed().as_micros() as u64,
                    "generation completed"
                );
                Ok((value, report))
            }
            Err(source) => {
                warn!(root = %root_name, error = %source, "generation failed");
                Err(GenerateError {
                    root: root_name,
                    source,
                })
            }
        }
    }
}

/// State shared by every recursive call of one top-level request.
pub(crate) struct GenerationContext<'a> {
    pub(crate) catalog: &'a TypeCatalog,
    pub(crate) leaves: &'a LeafRegistry,
    pub(crate) options: &'a GenerateOptions,
    pub(crate) rng: &'a mut dyn RngCore,
    pub(crate) report: &'a mut GenerationReport,
}

impl<'a> GenerationContext<'a> {
    /// Dispatch on the requested type. Leaves are produced at any depth; the
    /// depth bound only truncates containers and user-defined types.
    pub(crate) fn generate_value(
        &mut self,
        ty: &TypeRef,
        depth: usize,
    ) -> Result<Value, GenerationError> {
        let leaves = self.leaves;
        if let Some(generator) = leaves.find(ty) {
            return Ok(self.generate_leaf(generator, ty));
        }

        match ty {
            TypeRef::Any => self.generate_placeholder(),
            TypeRef::Leaf(kind) => Err(GenerationError::Unsupported(format!(
                "no leaf generator registered for '{}'",
                kind.name()
            ))),
            _ if depth > self.options.max_recursion_depth => {
                trace!(ty = %ty, depth, "depth bound reached");
                self.report.record_truncation();
                Ok(Value::Null)
            }
            TypeRef::Sequence(element) => self.generate_sequence(element, depth),
            TypeRef::Set(element) => self.generate_set(element, depth),
            TypeRef::Mapping(key, value) => self.generate_mapping(key, value, depth),
            TypeRef::Named(name) => self.generate_named(name, depth),
        }
    }

    fn generate_leaf(&mut self, generator: &dyn LeafGenerator, ty: &TypeRef) -> Value {
        let value = generator.generate(ty, &mut *self.rng);
        trace!(generator = generator.id(), ty = %ty, "leaf generated");
        self.report.record_leaf(generator.id());
        value
    }

    /// Unconstrained placeholder: a leaf of a randomly chosen kind.
    fn generate_placeholder(&mut self) -> Result<Value, GenerationError> {
        let kind = LeafKind::ALL[self.rng.random_range(0..LeafKind::ALL.len())];
        let ty = TypeRef::Leaf(kind);
        let leaves = self.leaves;
        let generator = leaves.find(&ty).ok_or_else(|| {
            GenerationError::Unsupported(format!(
                "no leaf generator registered for placeholder kind '{}'",
                kind.name()
            ))
        })?;
        Ok(self.generate_leaf(generator, &ty))
    }

    fn draw_size(&mut self) -> usize {
        self.rng.random_range(0..=self.options.max_collection_size)
    }

    fn generate_sequence(&mut self, element: &TypeRef, depth: usize) -> Result<Value, GenerationError> {
        let size = self.draw_size();
        let mut items = Vec::with_capacity(size);
        for _ in 0..size {
            items.push(self.generate_value(element, depth)?);
        }
        self.report.record_container();
        Ok(Value::Seq(items))
    }

    /// Collisions between drawn elements leave the set smaller than the drawn size.
    fn generate_set(&mut self, element: &TypeRef, depth: usize) -> Result<Value, GenerationError> {
        let size = self.draw_size();
        let mut items = BTreeSet::new();
        for _ in 0..size {
            items.insert(self.generate_value(element, depth)?);
        }
        self.report.record_container();
        Ok(Value::Set(items))
    }

    /// Later duplicate keys overwrite earlier entries.
    fn generate_mapping(
        &mut self,
        key: &TypeRef,
        value: &TypeRef,
        depth: usize,
    ) -> Result<Value, GenerationError> {
        let size = self.draw_size();
        let mut entries = BTreeMap::new();
        for _ in 0..size {
            let generated_key = self.generate_value(key, depth)?;
            let generated_value = self.generate_value(value, depth)?;
            entries.insert(generated_key, generated_value);
        }
        self.report.record_container();
        Ok(Value::Map(entries))
    }

    fn generate_named(&mut self, name: &str, depth: usize) -> Result<Value, GenerationError> {
        let catalog = self.catalog;
        let def = catalog.get(name).ok_or_else(|| {
            GenerationError::Unsupported(format!("type '{name}' is not declared in the catalog"))
        })?;

        if def.is_polymorphic() {
            self.generate_polymorphic(def, depth)
        } else {
            self.instantiate(def, depth)
        }
    }

    /// Choosing the implementation is not a structural layer: the chosen type
    /// is built at the depth of the polymorphic request.
    fn generate_polymorphic(&mut self, def: &'a TypeDef, depth: usize) -> Result<Value, GenerationError> {
        let catalog = self.catalog;
        let candidates = catalog.list_eligible_implementations(&def.name);
        if candidates.is_empty() {
            return Err(GenerationError::NoImplementationFound(def.name.clone()));
        }

        let chosen = candidates[self.rng.random_range(0..candidates.len())];
        debug!(
            polymorphic = %def.name,
            chosen = %chosen.name,
            candidates = candidates.len(),
            "implementation selected"
        );
        self.report.record_polymorphic(&def.name, &chosen.name);
        self.instantiate(chosen, depth)
    }
}
