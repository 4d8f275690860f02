use rand::{Rng, RngCore};

use specimen_core::{LeafKind, TypeRef, Value};

use crate::generators::primitives::lowercase_letter;
use crate::generators::{LeafGenerator, LeafRegistry};

pub fn register(registry: &mut LeafRegistry, max_len: usize) {
    registry.register_generator(Box::new(TextGenerator::new(max_len)));
}

/// Lowercase ASCII strings with a length drawn from `[0, max_len)`.
#[derive(Debug, Clone, Copy)]
pub struct TextGenerator {
    max_len: usize,
}

impl TextGenerator {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl LeafGenerator for TextGenerator {
    fn id(&self) -> &'static str {
        "text.lowercase"
    }

    fn supports(&self, ty: &TypeRef) -> bool {
        matches!(ty, TypeRef::Leaf(LeafKind::String))
    }

    fn generate(&self, _ty: &TypeRef, rng: &mut dyn RngCore) -> Value {
        let len = if self.max_len == 0 {
            0
        } else {
            rng.random_range(0..self.max_len)
        };
        let mut value = String::with_capacity(len);
        for _ in 0..len {
            value.push(lowercase_letter(rng));
        }
        Value::Text(value)
    }
}
