mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use specimen_core::{Constructor, TypeCatalog, TypeDef, TypeRef, Value};
use specimen_generate::{
    ConstructorPolicy, GenerateOptions, GenerationEngine, GenerationError, MAX_COLLECTION_SIZE,
    MAX_RECURSION_DEPTH,
};

use common::{engine, field, shop_catalog, tree_depth};

fn assert_product(value: &Value) {
    assert_eq!(value.type_name(), Some("Product"));
    assert!(field(value, "name").as_str().is_some(), "product name should be text");
    assert!(field(value, "price").as_f64().is_some());
    assert!(field(value, "quantity").as_i64().is_some());
}

fn assert_cart(value: &Value) {
    assert_eq!(value.type_name(), Some("Cart"));
    let items = field(value, "items").as_seq().expect("cart items should be a list");
    assert!(items.len() <= MAX_COLLECTION_SIZE);
    items.iter().for_each(assert_product);
}

#[test]
fn generates_product() {
    let mut engine = engine(42);
    let product = engine.generate_named("Product").expect("product");
    assert_product(&product);
}

#[test]
fn generates_cart_with_bounded_items() {
    let mut engine = engine(42);
    for _ in 0..10 {
        let cart = engine.generate_named("Cart").expect("cart");
        assert_cart(&cart);
    }
}

#[test]
fn generates_cart_storage_with_nested_generics() {
    let mut engine = engine(7);
    let storage = engine.generate_named("CartStorage").expect("cart storage");
    assert_eq!(storage.type_name(), Some("CartStorage"));

    let buyers = field(&storage, "buyer_carts")
        .as_map()
        .expect("buyer carts should be a mapping");
    assert!(buyers.len() <= MAX_COLLECTION_SIZE);
    for (buyer, carts) in buyers {
        assert!(buyer.as_str().is_some(), "buyer key should be text");
        let carts = carts.as_seq().expect("carts should be a list");
        assert!(carts.len() <= MAX_COLLECTION_SIZE);
        carts.iter().for_each(assert_cart);
    }
}

#[test]
fn polymorphic_requests_pick_registered_implementations() {
    let mut engine = engine(42);
    let catalog = shop_catalog();
    let allowed: Vec<&str> = catalog
        .list_eligible_implementations("Shape")
        .into_iter()
        .map(|def| def.name.as_str())
        .collect();
    assert_eq!(allowed, vec!["Rectangle", "Triangle"]);

    for _ in 0..20 {
        let (shape, report) = engine
            .generate_with_report(&TypeRef::named("Shape"))
            .expect("shape");
        let name = shape.type_name().expect("shape should be an object");
        assert!(allowed.contains(&name), "unexpected implementation {name}");
        assert_eq!(report.polymorphic_choices.len(), 1);
        assert!(report.polymorphic_choices.contains_key(&format!("Shape -> {name}")));

        for (_, side) in &shape.as_object().expect("object").fields {
            let side = side.as_f64().expect("side should be a float");
            assert!((0.0..1000.0).contains(&side));
        }
    }
}

#[test]
fn self_referential_tree_stops_at_depth_bound() {
    let mut engine = engine(42);
    let (tree, report) = engine
        .generate_with_report(&TypeRef::named("BinaryTreeNode"))
        .expect("tree");

    assert!(field(&tree, "data").as_i64().is_some(), "root data should be set");
    assert_eq!(tree_depth(&tree), MAX_RECURSION_DEPTH + 1);
    assert_eq!(report.max_depth_reached, MAX_RECURSION_DEPTH + 1);
    assert_eq!(report.truncated_branches, 1 << (MAX_RECURSION_DEPTH + 1));
}

#[test]
fn polymorphic_resolution_does_not_consume_depth() {
    let mut engine = engine(3);
    let tree = engine.generate_named("Tree").expect("tree");
    assert_eq!(tree.type_name(), Some("BinaryTreeNode"));
    assert_eq!(tree_depth(&tree), MAX_RECURSION_DEPTH + 1);
}

#[test]
fn container_elements_do_not_consume_depth() {
    let mut engine = engine(11);
    let request = TypeRef::list(TypeRef::named("BinaryTreeNode"));
    let mut trees_seen = 0;
    for _ in 0..20 {
        let trees = engine.generate(&request).expect("trees");
        for tree in trees.as_seq().expect("list") {
            assert_eq!(tree_depth(tree), MAX_RECURSION_DEPTH + 1);
            trees_seen += 1;
        }
    }
    assert!(trees_seen > 0, "expected at least one generated tree");
}

#[test]
fn nested_generic_arguments_are_threaded() {
    let mut engine = engine(5);
    let request = TypeRef::parse("List<Map<String, List<i32>>>").expect("type expression");
    for _ in 0..10 {
        let outer = engine.generate(&request).expect("nested value");
        for mapping in outer.as_seq().expect("outer list") {
            for (key, inner) in mapping.as_map().expect("mapping") {
                assert!(key.as_str().is_some());
                for item in inner.as_seq().expect("inner list") {
                    assert!(matches!(item, Value::I32(_)));
                }
            }
        }
    }
}

#[test]
fn sets_shrink_on_collisions() {
    let mut engine = engine(9);
    for _ in 0..20 {
        let flags = engine
            .generate(&TypeRef::parse("Set<bool>").expect("type expression"))
            .expect("set");
        assert!(flags.as_set().expect("set").len() <= 2);
    }
}

#[test]
fn raw_mapping_uses_placeholder_keys_and_values() {
    let mut engine = engine(42);
    let raw = TypeRef::parse("Map").expect("raw map");
    for _ in 0..10 {
        let value = engine.generate(&raw).expect("raw mapping should succeed");
        let entries = value.as_map().expect("mapping");
        assert!(entries.len() <= MAX_COLLECTION_SIZE);
        for (key, value) in entries {
            for leaf in [key, value] {
                assert!(
                    !matches!(
                        leaf,
                        Value::Null
                            | Value::Seq(_)
                            | Value::Set(_)
                            | Value::Map(_)
                            | Value::Object(_)
                    ),
                    "placeholder should be a leaf, got {leaf:?}"
                );
            }
        }
    }
}

#[test]
fn unmarked_type_is_not_eligible() {
    let mut engine = engine(42);
    let err = engine
        .generate_named("NotGeneratable")
        .expect_err("unmarked type must fail");
    assert_eq!(err.root, "NotGeneratable");
    assert!(matches!(err.cause(), GenerationError::NotEligible(name) if name == "NotGeneratable"));
    assert_eq!(
        err.to_string(),
        "failed to generate value for type: NotGeneratable"
    );
}

#[test]
fn nested_failures_are_reported_against_the_root() {
    let catalog = TypeCatalog::builder()
        .register(TypeDef::concrete("Hidden").constructor(Constructor::new()))
        .register(
            TypeDef::concrete("Wrapper")
                .generatable()
                .constructor(Constructor::new().param("inner", TypeRef::named("Hidden"))),
        )
        .build()
        .expect("catalog");
    let mut engine = GenerationEngine::new(Arc::new(catalog), GenerateOptions::default());

    let err = engine.generate_named("Wrapper").expect_err("nested failure");
    assert_eq!(err.root, "Wrapper");
    assert!(matches!(err.cause(), GenerationError::NotEligible(name) if name == "Hidden"));
}

#[test]
fn interface_without_implementations_fails() {
    let mut engine = engine(42);
    let err = engine.generate_named("Drawable").expect_err("no implementations");
    assert!(matches!(err.cause(), GenerationError::NoImplementationFound(name) if name == "Drawable"));
}

#[test]
fn type_without_constructors_fails() {
    let mut engine = engine(42);
    let err = engine.generate_named("Blank").expect_err("no constructors");
    assert!(matches!(err.cause(), GenerationError::NoConstructorAvailable(name) if name == "Blank"));
}

#[test]
fn constructor_errors_propagate_without_retry() {
    let mut engine = engine(42);
    let err = engine.generate_named("Validated").expect_err("constructor rejects");
    match err.cause() {
        GenerationError::ConstructionFailed {
            type_name,
            constructor,
            source,
        } => {
            assert_eq!(type_name, "Validated");
            assert_eq!(*constructor, 0);
            assert!(source.to_string().contains("shorter than 100"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn undeclared_type_is_unsupported() {
    let mut engine = engine(42);
    let err = engine.generate_named("Ghost").expect_err("undeclared type");
    assert!(matches!(err.cause(), GenerationError::Unsupported(_)));
}

#[test]
fn zero_argument_constructor_is_invoked() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let catalog = TypeCatalog::builder()
        .register(
            TypeDef::concrete("Session")
                .generatable()
                .constructor(Constructor::new().with_factory(move |args| {
                    assert!(args.is_empty());
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Text("session".to_string()))
                })),
        )
        .build()
        .expect("catalog");
    let mut engine = GenerationEngine::new(Arc::new(catalog), GenerateOptions::default());

    for expected in 1..=3 {
        let value = engine.generate_named("Session").expect("session");
        assert_eq!(value.as_str(), Some("session"));
        assert_eq!(calls.load(Ordering::SeqCst), expected);
    }
}

#[test]
fn widest_arity_policy_skips_minimal_constructors() {
    let mut engine = GenerationEngine::new(
        shop_catalog(),
        GenerateOptions {
            constructor_policy: ConstructorPolicy::WidestArity,
            ..GenerateOptions::default()
        },
    );
    for _ in 0..10 {
        let example = engine.generate_named("Example").expect("example");
        let object = example.as_object().expect("object");
        assert_eq!(object.fields.len(), 6);
        assert!(field(&example, "grade").as_char().is_some());
        assert!(field(&example, "tags").as_set().is_some());
        assert!(matches!(
            field(&example, "shape").type_name(),
            Some("Rectangle") | Some("Triangle")
        ));
    }
}

#[test]
fn uniform_policy_draws_every_constructor() {
    let mut engine = engine(42);
    assert_eq!(engine.options().constructor_policy, ConstructorPolicy::Uniform);

    let mut minimal = 0;
    let mut widest = 0;
    for _ in 0..200 {
        let example = engine.generate_named("Example").expect("example");
        let object = example.as_object().expect("object");
        match object.fields.len() {
            0 => minimal += 1,
            6 => {
                assert!(field(&example, "active").as_bool().is_some());
                widest += 1;
            }
            other => panic!("unexpected field count {other}"),
        }
    }
    assert!(minimal > 0, "zero-argument constructor never chosen");
    assert!(widest > 0, "six-argument constructor never chosen");
}

#[test]
fn depth_bound_truncates_containers_too() {
    let mut engine = GenerationEngine::new(
        shop_catalog(),
        GenerateOptions {
            max_recursion_depth: 0,
            ..GenerateOptions::default()
        },
    );
    let cart = engine.generate_named("Cart").expect("cart");
    assert!(field(&cart, "items").is_null());

    let product = engine.generate_named("Product").expect("product");
    assert!(field(&product, "name").as_str().is_some(), "leaves ignore the bound");
}

#[test]
fn collection_size_follows_options() {
    let mut engine = GenerationEngine::new(
        shop_catalog(),
        GenerateOptions {
            max_collection_size: 0,
            ..GenerateOptions::default()
        },
    );
    let storage = engine.generate_named("CartStorage").expect("storage");
    assert!(field(&storage, "buyer_carts").as_map().expect("map").is_empty());
}
