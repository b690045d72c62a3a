//! Source map (v3) generation.
//!
//! Generated artifacts carry mappings back to the declaration sites in
//! the original sources. The generator collects `(generated line/col,
//! source index, original line/col)` tuples and serializes them into
//! the standard source-map v3 JSON document, with VLQ-encoded
//! `mappings` and optionally embedded source contents.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// Base64 VLQ encoding used by the `mappings` field.
pub mod vlq {
    const BASE64_CHARS: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    const VLQ_BASE_SHIFT: u32 = 5;
    const VLQ_BASE: i64 = 1 << VLQ_BASE_SHIFT;
    const VLQ_BASE_MASK: i64 = VLQ_BASE - 1;
    const VLQ_CONTINUATION_BIT: i64 = VLQ_BASE;

    /// Encode a signed integer as a base64 VLQ string.
    #[must_use]
    pub fn encode(value: i64) -> String {
        let mut vlq = if value < 0 {
            ((-value) << 1) | 1
        } else {
            value << 1
        };
        let mut out = String::new();
        loop {
            let mut digit = vlq & VLQ_BASE_MASK;
            vlq >>= VLQ_BASE_SHIFT;
            if vlq > 0 {
                digit |= VLQ_CONTINUATION_BIT;
            }
            out.push(BASE64_CHARS[digit as usize] as char);
            if vlq == 0 {
                break;
            }
        }
        out
    }
}

/// Plain base64 (RFC 4648, with padding) for inline source-map URIs.
fn base64_encode(input: &[u8]) -> String {
    const CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let triple = (b0 << 16) | (b1 << 8) | b2;
        out.push(CHARS[(triple >> 18) as usize & 63] as char);
        out.push(CHARS[(triple >> 12) as usize & 63] as char);
        if chunk.len() > 1 {
            out.push(CHARS[(triple >> 6) as usize & 63] as char);
        } else {
            out.push('=');
        }
        if chunk.len() > 2 {
            out.push(CHARS[triple as usize & 63] as char);
        } else {
            out.push('=');
        }
    }
    out
}

/// A finished source map document (source map v3).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    pub file: String,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Serialize to the JSON document consumers expect.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// One raw mapping entry, in generated-output order.
#[derive(Debug, Clone, Copy)]
struct Mapping {
    generated_line: u32,
    generated_column: u32,
    source_index: u32,
    source_line: u32,
    source_column: u32,
    name_index: Option<u32>,
}

/// Incremental source map builder.
///
/// Sources and names are deduplicated by value; mappings may be added
/// in any order and are sorted by generated position at `generate`
/// time.
#[derive(Debug)]
pub struct SourceMapGenerator {
    file: String,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    source_indices: FxHashMap<String, u32>,
    names: Vec<String>,
    name_indices: FxHashMap<String, u32>,
    mappings: Vec<Mapping>,
}

impl SourceMapGenerator {
    #[must_use]
    pub fn new(file: String) -> Self {
        Self {
            file,
            sources: Vec::new(),
            sources_content: Vec::new(),
            source_indices: FxHashMap::default(),
            names: Vec::new(),
            name_indices: FxHashMap::default(),
            mappings: Vec::new(),
        }
    }

    /// Register a source file without content. Returns its index.
    /// Registering the same source twice returns the original index.
    pub fn add_source(&mut self, source: String) -> u32 {
        if let Some(&idx) = self.source_indices.get(&source) {
            return idx;
        }
        let idx = u32::try_from(self.sources.len()).unwrap_or(u32::MAX);
        self.source_indices.insert(source.clone(), idx);
        self.sources.push(source);
        self.sources_content.push(None);
        idx
    }

    /// Register a source file with its text content. Returns its index.
    pub fn add_source_with_content(&mut self, source: String, content: String) -> u32 {
        let idx = self.add_source(source);
        if let Some(slot) = self.sources_content.get_mut(idx as usize) {
            *slot = Some(content);
        }
        idx
    }

    /// Check whether a source is already registered.
    #[must_use]
    pub fn has_source(&self, source: &str) -> bool {
        self.source_indices.contains_key(source)
    }

    /// Register a symbol name. Returns its index.
    pub fn add_name(&mut self, name: String) -> u32 {
        if let Some(&idx) = self.name_indices.get(&name) {
            return idx;
        }
        let idx = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        self.name_indices.insert(name.clone(), idx);
        self.names.push(name);
        idx
    }

    /// Add a mapping from a generated position to an original position.
    pub fn add_mapping(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        source_index: u32,
        source_line: u32,
        source_column: u32,
        name_index: Option<u32>,
    ) {
        self.mappings.push(Mapping {
            generated_line,
            generated_column,
            source_index,
            source_line,
            source_column,
            name_index,
        });
    }

    /// Add a mapping without a name.
    pub fn add_simple_mapping(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        source_index: u32,
        source_line: u32,
        source_column: u32,
    ) {
        self.add_mapping(
            generated_line,
            generated_column,
            source_index,
            source_line,
            source_column,
            None,
        );
    }

    /// Produce the finished source map.
    #[must_use]
    pub fn generate(&self) -> SourceMap {
        let mut sorted = self.mappings.clone();
        sorted.sort_by_key(|m| (m.generated_line, m.generated_column));

        let mut mappings = String::new();
        let mut current_line = 0u32;
        let mut prev_generated_column = 0i64;
        let mut prev_source_index = 0i64;
        let mut prev_source_line = 0i64;
        let mut prev_source_column = 0i64;
        let mut prev_name_index = 0i64;
        let mut first_on_line = true;

        for m in &sorted {
            while current_line < m.generated_line {
                mappings.push(';');
                current_line += 1;
                prev_generated_column = 0;
                first_on_line = true;
            }
            if !first_on_line {
                mappings.push(',');
            }
            first_on_line = false;

            mappings.push_str(&vlq::encode(i64::from(m.generated_column) - prev_generated_column));
            prev_generated_column = i64::from(m.generated_column);

            mappings.push_str(&vlq::encode(i64::from(m.source_index) - prev_source_index));
            prev_source_index = i64::from(m.source_index);

            mappings.push_str(&vlq::encode(i64::from(m.source_line) - prev_source_line));
            prev_source_line = i64::from(m.source_line);

            mappings.push_str(&vlq::encode(i64::from(m.source_column) - prev_source_column));
            prev_source_column = i64::from(m.source_column);

            if let Some(name_index) = m.name_index {
                mappings.push_str(&vlq::encode(i64::from(name_index) - prev_name_index));
                prev_name_index = i64::from(name_index);
            }
        }

        let sources_content = if self.sources_content.iter().any(Option::is_some) {
            Some(self.sources_content.clone())
        } else {
            None
        };

        SourceMap {
            version: 3,
            file: self.file.clone(),
            sources: self.sources.clone(),
            sources_content,
            names: self.names.clone(),
            mappings,
        }
    }

    /// Produce an inline source-map comment (base64 data URI).
    #[must_use]
    pub fn generate_inline(&self) -> String {
        let json = self.generate().to_json();
        format!(
            "//# sourceMappingURL=data:application/json;base64,{}",
            base64_encode(json.as_bytes())
        )
    }
}

#[cfg(test)]
#[path = "../tests/source_map.rs"]
mod tests;
