//! Orchestrator invariants: memoization, cycle breaking, file
//! assignment, failure semantics and source maps.

#[path = "support.rs"]
mod support;

use support::{RecordBackend, StoreWithSources};
use rustc_hash::FxHashMap;
use tygen_common::SourceLocation;
use tygen_emitter::{Compiler, EntryPoint, Location, compile};
use tygen_model::{
    CompileErrorKind, TypeId, TypeKind, TypeMember, TypeOrigin, TypePath, TypeStore,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn backend_runs_once_per_type() {
    init_tracing();
    let store = TypeStore::new();
    let shared = store.interface("Shared", vec![TypeMember::new("n", TypeId::NUMBER)]);
    let root = store.interface(
        "Root",
        vec![
            TypeMember::new("p", shared),
            TypeMember::new("q", shared),
        ],
    );
    let backend = RecordBackend::new();

    let output = compile(
        &store,
        &backend,
        &[EntryPoint::new(root, Location::new("out.rec"))],
    )
    .expect("compilation should succeed");

    // Reached at two paths, compiled once.
    assert_eq!(backend.calls_for(shared), 1);
    assert_eq!(
        output.files["out.rec"].text.matches("record Shared").count(),
        1
    );
}

#[test]
fn cyclic_revisits_emit_reference_nodes() {
    let store = TypeStore::new();
    let node = store.reserve();
    store.fill(
        node,
        tygen_model::TypeData::Object(
            tygen_model::ObjectType::new(
                tygen_model::ObjectFlavor::Interface,
                Some("Node".to_owned()),
                vec![TypeMember::new("next", node)],
            )
            .into(),
        ),
    );
    let backend = RecordBackend::new();

    let output = compile(
        &store,
        &backend,
        &[EntryPoint::new(node, Location::new("out.rec"))],
    )
    .expect("compilation should succeed");

    // The cycle-breaking reference records an edge back to the
    // declaring file itself.
    let references = output.program.files()["out.rec"].references();
    assert!(references.iter().any(|r| r.name == "Node"));
}

#[test]
fn shared_declarations_are_contributed_once_across_entries() {
    let store = TypeStore::new();
    let inner = store.interface("Inner", vec![TypeMember::new("n", TypeId::NUMBER)]);
    let first = store.interface("First", vec![TypeMember::new("inner", inner)]);
    let second = store.interface("Second", vec![TypeMember::new("inner", inner)]);
    let backend = RecordBackend::new();
    backend.suggest(inner, Location::new("shared.rec"));

    let output = compile(
        &store,
        &backend,
        &[
            EntryPoint::new(first, Location::new("a.rec")),
            EntryPoint::new(second, Location::new("b.rec")),
        ],
    )
    .expect("compilation should succeed");

    // Inner is declared exactly once, in its own file.
    assert_eq!(output.program.files()["shared.rec"].nodes().len(), 1);
    assert_eq!(
        output.files["shared.rec"].text.matches("record Inner").count(),
        1
    );
    // Both referencing files import it.
    assert!(output.files["a.rec"].text.contains("using shared.rec;"));
    assert!(output.files["b.rec"].text.contains("using shared.rec;"));
}

#[test]
fn compilation_is_deterministic() {
    let build = || {
        let store = TypeStore::new();
        let shared = store.interface("Shared", vec![TypeMember::new("n", TypeId::NUMBER)]);
        let anon_a = store.object(vec![TypeMember::new("a", shared)]);
        let anon_b = store.object(vec![TypeMember::new("b", shared)]);
        let union = store.union(vec![anon_a, anon_b]);
        let backend = RecordBackend::new();
        let output = compile(
            &store,
            &backend,
            &[EntryPoint::new(union, Location::new("out.rec"))],
        )
        .expect("compilation should succeed");
        output.files["out.rec"].text.clone()
    };

    assert_eq!(build(), build());
}

#[test]
fn errors_carry_exactly_one_path_annotation() {
    let store = TypeStore::new();
    let sym = store.unique_symbol("token");
    let inner = store.interface("Inner", vec![TypeMember::new("sym", sym)]);
    let outer = store.interface("Outer", vec![TypeMember::new("inner", inner)]);
    let backend = RecordBackend::new();

    let error = compile(
        &store,
        &backend,
        &[EntryPoint::new(outer, Location::new("out.rec"))],
    )
    .expect_err("unique symbols have no record form");

    assert!(matches!(
        error.kind(),
        CompileErrorKind::NoBackendForKind {
            kind: TypeKind::UniqueSymbol
        }
    ));
    let rendered = error.to_string();
    assert_eq!(rendered.matches("Path:").count(), 1);
    assert!(rendered.contains("Outer.inner.sym"));
}

#[test]
fn adapter_errors_surface_before_the_backend() {
    let store = TypeStore::new();
    let broken = store.error("mapped types are not supported");
    let holder = store.interface("Holder", vec![TypeMember::new("broken", broken)]);
    let backend = RecordBackend::new();

    let error = compile(
        &store,
        &backend,
        &[EntryPoint::new(holder, Location::new("out.rec"))],
    )
    .expect_err("error types do not compile");

    assert!(matches!(
        error.kind(),
        CompileErrorKind::TypeHasError { .. }
    ));
    // The backend never saw the broken type.
    assert_eq!(backend.calls_for(broken), 0);
}

#[test]
fn references_require_an_output_location() {
    let store = TypeStore::new();
    let point = store.interface("Point", Vec::new());
    let backend = RecordBackend::new();
    let compiler = Compiler::new(&store, &backend);

    // No program, no entry, no current output location.
    let error = compiler
        .compile_type(point, &TypePath::empty())
        .expect_err("nowhere to refer from");

    assert!(matches!(
        error.kind(),
        CompileErrorKind::ReferenceWithoutLocation
    ));
}

#[test]
fn unbreakable_cycles_produce_the_circular_diagnostic() {
    let store = TypeStore::new();
    // An anonymous self-referential object: no name, no declaration
    // location, nothing to break the cycle with.
    let node = store.reserve();
    store.fill(
        node,
        tygen_model::TypeData::Object(
            tygen_model::ObjectType::new(
                tygen_model::ObjectFlavor::Object,
                None,
                vec![TypeMember::new("next", node)],
            )
            .into(),
        ),
    );
    let backend = RecordBackend::new();

    // Compile the anonymous object directly: it renders inline, so no
    // declaration location is ever assigned and the cycle cannot
    // break.
    let compiler = Compiler::new(&store, &backend);
    let error = compiler
        .compile_type_in(node, TypePath::empty(), Location::new("out.rec"))
        .expect_err("anonymous self-reference cannot compile");

    assert!(matches!(
        error.kind(),
        CompileErrorKind::CircularCompilation { .. }
    ));
}

#[test]
fn source_maps_attribute_declarations() {
    let store = TypeStore::new();
    let point = store.interface("Point", vec![TypeMember::new("x", TypeId::NUMBER)]);
    store.set_origin(
        point,
        TypeOrigin {
            host: None,
            declaration: Some(SourceLocation::new("geometry.src", 4, 0)),
            documentation: None,
            exported: true,
        },
    );
    let mut files = FxHashMap::default();
    files.insert(
        "geometry.src".to_owned(),
        "\n\n\n\ninterface Point { x: number }\n".to_owned(),
    );
    let db = StoreWithSources {
        store: &store,
        files,
    };
    let backend = RecordBackend::new();

    let output = compile(
        &db,
        &backend,
        &[EntryPoint::new(point, Location::new("out.rec"))],
    )
    .expect("compilation should succeed");

    let map = &output.files["out.rec"].source_map;
    assert_eq!(map.version, 3);
    assert_eq!(map.file, "out.rec");
    assert_eq!(map.sources, vec!["geometry.src"]);
    let content = map
        .sources_content
        .as_ref()
        .expect("content should be embedded");
    assert!(content[0].as_deref().is_some_and(|c| c.contains("interface Point")));
    assert!(map.names.contains(&"Point".to_owned()));
    assert!(!map.mappings.is_empty());
}

#[test]
fn compiled_from_lists_entry_types_per_file() {
    let store = TypeStore::new();
    let a = store.interface("A", Vec::new());
    let b = store.interface("B", Vec::new());
    let backend = RecordBackend::new();

    let output = compile(
        &store,
        &backend,
        &[
            EntryPoint::new(a, Location::new("one.rec")),
            EntryPoint::new(b, Location::new("one.rec")),
        ],
    )
    .expect("compilation should succeed");

    assert_eq!(output.files["one.rec"].compiled_from, vec![a, b]);
}

#[test]
fn lazy_adapted_hosts_compile_end_to_end() {
    use tygen_source::{
        Adapter, AdapterOptions, HostTypeId, RawMember, RawPrimitive, RawType, TypeSource,
    };
    use tygen_model::ObjectFlavor;

    struct TinyHost;

    impl TypeSource for TinyHost {
        fn raw(&self, host: HostTypeId) -> RawType {
            match host.0 {
                1 => RawType::ObjectLike {
                    flavor: ObjectFlavor::Interface,
                    name: Some("User".to_owned()),
                    members: vec![
                        RawMember::new("id", HostTypeId(2)),
                        RawMember::new("name", HostTypeId(3)),
                    ],
                    call_signature: None,
                    ctor_signature: None,
                    type_parameters: Vec::new(),
                    string_index: None,
                    number_index: None,
                },
                2 => RawType::Primitive(RawPrimitive::Number),
                _ => RawType::Primitive(RawPrimitive::String),
            }
        }
    }

    let host = TinyHost;
    let store = TypeStore::new();
    let adapter = Adapter::new(
        &host,
        &store,
        AdapterOptions {
            eager: false,
            ..AdapterOptions::default()
        },
    );
    let user = adapter.adapt(HostTypeId(1));
    let backend = RecordBackend::new();

    let output = compile(
        &adapter,
        &backend,
        &[EntryPoint::new(user, Location::new("out.rec"))],
    )
    .expect("compilation should succeed");

    assert_eq!(
        output.files["out.rec"].text,
        "record User {\n    id: number;\n    name: string;\n}\n"
    );
}
