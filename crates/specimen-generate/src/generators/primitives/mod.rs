use rand::{Rng, RngCore};

use specimen_core::{LeafKind, TypeRef, Value};

use crate::generators::{LeafGenerator, LeafRegistry};

const ALPHABET_SIZE: u8 = 26;
const FLOAT_SCALE: f64 = 1000.0;

pub fn register(registry: &mut LeafRegistry) {
    registry.register_generator(Box::new(PrimitiveGenerator));
}

/// Numbers, booleans and characters.
///
/// `i32`/`i64` span their whole range, floats fall in `[0, 1000)`, `i8`/`i16`
/// in `[0, MAX)`, and characters are lowercase ASCII letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveGenerator;

impl LeafGenerator for PrimitiveGenerator {
    fn id(&self) -> &'static str {
        "primitive"
    }

    fn supports(&self, ty: &TypeRef) -> bool {
        matches!(ty, TypeRef::Leaf(kind) if *kind != LeafKind::String)
    }

    fn generate(&self, ty: &TypeRef, rng: &mut dyn RngCore) -> Value {
        match ty {
            TypeRef::Leaf(kind) => generate_primitive(*kind, rng),
            _ => Value::Null,
        }
    }
}

fn generate_primitive(kind: LeafKind, rng: &mut dyn RngCore) -> Value {
    match kind {
        LeafKind::I8 => Value::I8(rng.random_range(0..i8::MAX)),
        LeafKind::I16 => Value::I16(rng.random_range(0..i16::MAX)),
        LeafKind::I32 => Value::I32(rng.random()),
        LeafKind::I64 => Value::I64(rng.random()),
        LeafKind::F32 => Value::F32(rng.random::<f32>() * FLOAT_SCALE as f32),
        LeafKind::F64 => Value::F64(rng.random::<f64>() * FLOAT_SCALE),
        LeafKind::Bool => Value::Bool(rng.random_bool(0.5)),
        LeafKind::Char => Value::Char(lowercase_letter(rng)),
        // Claimed by the text generator.
        LeafKind::String => Value::Null,
    }
}

/// Uniform draw over `a..=z`.
pub fn lowercase_letter(rng: &mut dyn RngCore) -> char {
    char::from(b'a' + rng.random_range(0..ALPHABET_SIZE))
}
