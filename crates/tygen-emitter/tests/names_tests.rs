use super::*;
use tygen_model::{ObjectFlavor, ObjectType, TypeData, TypeId, TypeMember, TypeStore};

#[test]
fn named_types_keep_their_name() {
    let store = TypeStore::new();
    let point = store.interface("Point", Vec::new());

    assert_eq!(infer_type_name(&store, point), "Point");
}

#[test]
fn primitives_use_their_camel_kind() {
    let store = TypeStore::new();
    assert_eq!(infer_type_name(&store, TypeId::STRING), "String");
    assert_eq!(infer_type_name(&store, TypeId::NON_PRIMITIVE), "NonPrimitiveObject");
}

#[test]
fn arrays_derive_from_their_element() {
    let store = TypeStore::new();
    let numbers = store.array(TypeId::NUMBER);
    assert_eq!(infer_type_name(&store, numbers), "ArrayOfNumber");

    let anonymous = store.object(Vec::new());
    let objects = store.array(anonymous);
    assert_eq!(infer_type_name(&store, objects), "Array");
}

#[test]
fn unions_join_variant_names_with_or() {
    let store = TypeStore::new();
    let union = store.union(vec![TypeId::STRING, TypeId::NUMBER]);
    assert_eq!(infer_type_name(&store, union), "StringOrNumber");
}

#[test]
fn unions_with_anonymous_variants_fall_back() {
    let store = TypeStore::new();
    let anonymous = store.object(Vec::new());
    let union = store.union(vec![TypeId::STRING, anonymous]);
    assert_eq!(infer_type_name(&store, union), "Union");
}

#[test]
fn discriminated_unions_name_by_discriminant() {
    let store = TypeStore::new();
    let kind_a = store.literal_string("a");
    let kind_b = store.literal_string("b");
    let variant_a = store.object(vec![
        TypeMember::new("kind", kind_a),
        TypeMember::new("x", TypeId::NUMBER),
    ]);
    let variant_b = store.object(vec![
        TypeMember::new("kind", kind_b),
        TypeMember::new("y", TypeId::STRING),
    ]);
    let union =
        store.union_with_discriminants(vec![variant_a, variant_b], vec!["kind".to_owned()]);

    assert_eq!(infer_type_name(&store, union), "AOrB");
}

#[test]
fn intersections_join_with_and() {
    let store = TypeStore::new();
    let a = store.interface("Left", Vec::new());
    let b = store.interface("Right", Vec::new());
    let intersection = store.intersection(vec![a, b]);

    assert_eq!(infer_type_name(&store, intersection), "LeftAndRight");
}

#[test]
fn generic_arguments_name_target_of_arguments() {
    let store = TypeStore::new();
    let target = store.interface("Box", Vec::new());
    let instantiated = store.object(Vec::new());
    let generic = store.generic_arguments(target, vec![TypeId::STRING], instantiated);

    assert_eq!(infer_type_name(&store, generic), "BoxOfString");
}

#[test]
fn generic_arguments_fall_back_to_the_instantiated_name() {
    let store = TypeStore::new();
    let target = store.object(Vec::new());
    let instantiated = store.interface("BoxOfString", Vec::new());
    let generic = store.generic_arguments(target, vec![TypeId::STRING], instantiated);

    assert_eq!(infer_type_name(&store, generic), "BoxOfString");
}

#[test]
fn literal_names() {
    let store = TypeStore::new();
    assert_eq!(infer_type_name(&store, store.literal_string("hello world")), "HelloWorld");
    assert_eq!(infer_type_name(&store, store.literal_string("2d")), "N2d");
    assert_eq!(infer_type_name(&store, store.literal_boolean(true)), "True");
    assert_eq!(infer_type_name(&store, store.literal_number(1.0)), "N1");
    assert_eq!(infer_type_name(&store, store.literal_number(2.5)), "N2_5");
}

#[test]
fn anonymous_types_fall_back_to_their_kind() {
    let store = TypeStore::new();
    let anonymous = store.object(Vec::new());
    assert_eq!(infer_type_name(&store, anonymous), "AnonymousObject");

    let function = store.function(Vec::new(), TypeId::VOID);
    assert_eq!(infer_type_name(&store, function), "AnonymousFunction");
}

#[test]
fn cyclic_anonymous_types_terminate() {
    let store = TypeStore::new();
    let node = store.reserve();
    store.fill(
        node,
        TypeData::Object(
            ObjectType::new(
                ObjectFlavor::Object,
                None,
                vec![TypeMember::new("next", node)],
            )
            .into(),
        ),
    );
    let list = store.array(node);

    // The cyclic element contributes no name; the array falls back.
    assert_eq!(infer_type_name(&store, list), "Array");
}

#[test]
fn inference_is_deterministic() {
    let store = TypeStore::new();
    let union = store.union(vec![TypeId::STRING, TypeId::NUMBER, TypeId::BOOLEAN]);

    let first = infer_type_name(&store, union);
    let second = infer_type_name(&store, union);
    assert_eq!(first, second);
}
