use std::fmt;

use rand::RngCore;

use specimen_core::{TypeRef, Value};

use crate::model::MAX_STRING_LENGTH;

pub mod primitives;
pub mod text;

/// Strategy producing terminal values straight from the random source.
///
/// `generate` is only called for types this generator `supports`.
pub trait LeafGenerator: Send + Sync {
    fn id(&self) -> &'static str;

    fn supports(&self, ty: &TypeRef) -> bool;

    fn generate(&self, ty: &TypeRef, rng: &mut dyn RngCore) -> Value;
}

/// Ordered leaf generators; the first one supporting a type wins.
pub struct LeafRegistry {
    generators: Vec<Box<dyn LeafGenerator>>,
}

impl LeafRegistry {
    /// Registry with the built-in primitive and text generators.
    pub fn new() -> Self {
        Self::with_string_length(MAX_STRING_LENGTH)
    }

    pub fn with_string_length(max_string_length: usize) -> Self {
        let mut registry = Self::empty();
        primitives::register(&mut registry);
        text::register(&mut registry, max_string_length);
        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// Append a generator after the ones already registered.
    pub fn register_generator(&mut self, generator: Box<dyn LeafGenerator>) {
        self.generators.push(generator);
    }

    pub fn find(&self, ty: &TypeRef) -> Option<&dyn LeafGenerator> {
        self.generators
            .iter()
            .find(|generator| generator.supports(ty))
            .map(|generator| generator.as_ref())
    }

    pub fn generator_ids(&self) -> Vec<&'static str> {
        self.generators.iter().map(|generator| generator.id()).collect()
    }
}

impl Default for LeafRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LeafRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.generator_ids()).finish()
    }
}
