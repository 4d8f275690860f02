#![allow(dead_code)]

use std::sync::Arc;

use specimen_core::{Constructor, LeafKind, TypeCatalog, TypeDef, TypeRef, Value};
use specimen_generate::{GenerateOptions, GenerationEngine};

pub fn shop_catalog() -> Arc<TypeCatalog> {
    let catalog = TypeCatalog::builder()
        .register(
            TypeDef::concrete("Product").generatable().constructor(
                Constructor::new()
                    .param("name", TypeRef::string())
                    .param("price", TypeRef::leaf(LeafKind::F64))
                    .param("quantity", TypeRef::leaf(LeafKind::I32)),
            ),
        )
        .register(
            TypeDef::concrete("Cart").generatable().constructor(
                Constructor::new().param("items", TypeRef::list(TypeRef::named("Product"))),
            ),
        )
        .register(
            TypeDef::concrete("CartStorage").generatable().constructor(
                Constructor::new().param(
                    "buyer_carts",
                    TypeRef::map(TypeRef::string(), TypeRef::list(TypeRef::named("Cart"))),
                ),
            ),
        )
        .register(TypeDef::interface("Shape"))
        .register(
            TypeDef::concrete("Rectangle")
                .generatable()
                .implements("Shape")
                .constructor(
                    Constructor::new()
                        .param("width", TypeRef::leaf(LeafKind::F64))
                        .param("height", TypeRef::leaf(LeafKind::F64)),
                ),
        )
        .register(
            TypeDef::concrete("Triangle")
                .generatable()
                .implements("Shape")
                .constructor(
                    Constructor::new()
                        .param("a", TypeRef::leaf(LeafKind::F64))
                        .param("b", TypeRef::leaf(LeafKind::F64))
                        .param("c", TypeRef::leaf(LeafKind::F64)),
                ),
        )
        .register(TypeDef::interface("Tree"))
        .register(
            TypeDef::concrete("BinaryTreeNode")
                .generatable()
                .implements("Tree")
                .constructor(
                    Constructor::new()
                        .param("data", TypeRef::leaf(LeafKind::I32))
                        .param("left", TypeRef::named("BinaryTreeNode"))
                        .param("right", TypeRef::named("BinaryTreeNode")),
                ),
        )
        .register(
            TypeDef::concrete("Example")
                .generatable()
                .constructor(Constructor::new())
                .constructor(
                    Constructor::new()
                        .param("id", TypeRef::leaf(LeafKind::I64))
                        .param("label", TypeRef::string())
                        .param("active", TypeRef::leaf(LeafKind::Bool))
                        .param("grade", TypeRef::leaf(LeafKind::Char))
                        .param("tags", TypeRef::set(TypeRef::string()))
                        .param("shape", TypeRef::named("Shape")),
                ),
        )
        .register(
            TypeDef::concrete("NotGeneratable")
                .constructor(Constructor::new().param("x", TypeRef::leaf(LeafKind::I32))),
        )
        .register(TypeDef::interface("Drawable"))
        .register(TypeDef::concrete("Blank").generatable())
        .register(
            TypeDef::concrete("Validated").generatable().constructor(
                Constructor::new()
                    .param("code", TypeRef::string())
                    .with_factory(|args| {
                        let code = args.first().and_then(Value::as_str).unwrap_or_default();
                        if code.len() < 100 {
                            return Err(format!("code '{code}' is shorter than 100 characters").into());
                        }
                        Ok(Value::Text(code.to_string()))
                    }),
            ),
        )
        .build()
        .expect("shop catalog is valid");
    Arc::new(catalog)
}

pub fn engine(seed: u64) -> GenerationEngine {
    GenerationEngine::new(
        shop_catalog(),
        GenerateOptions {
            seed,
            ..GenerateOptions::default()
        },
    )
}

pub fn field<'a>(value: &'a Value, name: &str) -> &'a Value {
    value
        .as_object()
        .and_then(|object| object.field(name))
        .unwrap_or_else(|| panic!("missing field '{name}' in {value:?}"))
}

/// Structural layers of a binary tree value; null counts as zero.
pub fn tree_depth(value: &Value) -> usize {
    if value.is_null() {
        return 0;
    }
    let left = tree_depth(field(value, "left"));
    let right = tree_depth(field(value, "right"));
    left.max(right) + 1
}
