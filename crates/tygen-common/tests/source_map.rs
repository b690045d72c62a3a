use super::*;

#[test]
fn test_vlq_encode() {
    assert_eq!(vlq::encode(0), "A");
    assert_eq!(vlq::encode(1), "C");
    assert_eq!(vlq::encode(-1), "D");
    assert_eq!(vlq::encode(15), "e");
    assert_eq!(vlq::encode(16), "gB");
    assert_eq!(vlq::encode(-16), "hB");
}

#[test]
fn test_simple_source_map() {
    let mut generator = SourceMapGenerator::new("output.rec".to_string());
    let _ = generator.add_source("input.src".to_string());

    // Add some mappings
    generator.add_simple_mapping(0, 0, 0, 0, 0);
    generator.add_simple_mapping(0, 4, 0, 0, 4);
    generator.add_simple_mapping(1, 0, 0, 1, 0);

    let map = generator.generate();

    assert_eq!(map.version, 3);
    assert_eq!(map.file, "output.rec");
    assert_eq!(map.sources, vec!["input.src"]);
    assert!(!map.mappings.is_empty());
    // Two generated lines -> exactly one line separator
    assert_eq!(map.mappings.matches(';').count(), 1);
}

#[test]
fn test_source_deduplication() {
    let mut generator = SourceMapGenerator::new("out".to_string());
    let a = generator.add_source("a.src".to_string());
    let b = generator.add_source("b.src".to_string());
    let a_again = generator.add_source("a.src".to_string());

    assert_eq!(a, a_again);
    assert_ne!(a, b);
    assert_eq!(generator.generate().sources.len(), 2);
}

#[test]
fn test_inline_source_map() {
    let mut generator = SourceMapGenerator::new("output.rec".to_string());
    let _ = generator.add_source("input.src".to_string());
    generator.add_simple_mapping(0, 0, 0, 0, 0);

    let inline = generator.generate_inline();

    assert!(inline.starts_with("//# sourceMappingURL=data:application/json;base64,"));
}

#[test]
fn test_with_names() {
    let mut generator = SourceMapGenerator::new("output.rec".to_string());
    let _ = generator.add_source("input.src".to_string());

    let name_idx = generator.add_name("myType".to_string());
    generator.add_mapping(0, 0, 0, 0, 0, Some(name_idx));

    let map = generator.generate();

    assert_eq!(map.names, vec!["myType"]);
}

#[test]
fn test_with_source_content() {
    let mut generator = SourceMapGenerator::new("output.rec".to_string());
    let _ =
        generator.add_source_with_content("input.src".to_string(), "const x = 1;".to_string());

    let map = generator.generate();

    let content = map.sources_content.expect("content should be embedded");
    assert_eq!(content[0].as_deref(), Some("const x = 1;"));
}

#[test]
fn test_content_null_for_unregistered_sources() {
    let mut generator = SourceMapGenerator::new("output.rec".to_string());
    let _ = generator.add_source("stdlib.src".to_string());
    let _ = generator.add_source_with_content("user.src".to_string(), "type T = 1".to_string());

    let map = generator.generate();
    let content = map.sources_content.expect("content should be embedded");
    assert_eq!(content[0], None);
    assert_eq!(content[1].as_deref(), Some("type T = 1"));
}

#[test]
fn test_json_serialization_shape() {
    let mut generator = SourceMapGenerator::new("output.rec".to_string());
    let _ = generator.add_source("input.src".to_string());
    generator.add_simple_mapping(0, 0, 0, 0, 0);

    let json = generator.generate().to_json();
    assert!(json.contains("\"version\":3"));
    assert!(json.contains("\"sources\":[\"input.src\"]"));
    assert!(json.contains("\"mappings\""));
}
