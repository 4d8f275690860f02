use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 42;
pub const MAX_COLLECTION_SIZE: usize = 5;
pub const MAX_RECURSION_DEPTH: usize = 3;
pub const MAX_STRING_LENGTH: usize = 50;

/// How a structural type's constructor is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructorPolicy {
    /// Uniform over every declared constructor, zero-argument ones included.
    #[default]
    Uniform,
    /// Uniform over the constructors with the most parameters.
    WidestArity,
}

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Seed of the engine's random source.
    pub seed: u64,
    /// Upper bound (inclusive) of drawn container sizes.
    pub max_collection_size: usize,
    /// Structural layers below the root before branches are truncated to null.
    pub max_recursion_depth: usize,
    /// Exclusive upper bound of generated string lengths.
    pub max_string_length: usize,
    pub constructor_policy: ConstructorPolicy,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_collection_size: MAX_COLLECTION_SIZE,
            max_recursion_depth: MAX_RECURSION_DEPTH,
            max_string_length: MAX_STRING_LENGTH,
            constructor_policy: ConstructorPolicy::Uniform,
        }
    }
}

/// Summary of a single top-level generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub root: String,
    pub values_generated: u64,
    pub leaf_usage: BTreeMap<String, u64>,
    pub structural_instances: BTreeMap<String, u64>,
    pub polymorphic_choices: BTreeMap<String, u64>,
    pub containers: u64,
    /// Branches replaced by null at the depth bound.
    pub truncated_branches: u64,
    /// Deepest structural layer instantiated (the root is layer 1).
    pub max_depth_reached: usize,
}

impl GenerationReport {
    pub fn new(root: String) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    pub fn record_leaf(&mut self, generator_id: &str) {
        self.values_generated += 1;
        *self.leaf_usage.entry(generator_id.to_string()).or_insert(0) += 1;
    }

    pub fn record_container(&mut self) {
        self.values_generated += 1;
        self.containers += 1;
    }

    pub fn record_structural(&mut self, type_name: &str, depth: usize) {
        self.values_generated += 1;
        *self
            .structural_instances
            .entry(type_name.to_string())
            .or_insert(0) += 1;
        self.max_depth_reached = self.max_depth_reached.max(depth + 1);
    }

    pub fn record_polymorphic(&mut self, target: &str, chosen: &str) {
        *self
            .polymorphic_choices
            .entry(format!("{target} -> {chosen}"))
            .or_insert(0) += 1;
    }

    pub fn record_truncation(&mut self) {
        self.values_generated += 1;
        self.truncated_branches += 1;
    }
}
