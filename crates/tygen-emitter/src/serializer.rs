//! Node-tree serialization.
//!
//! Concatenates node text in tree order while threading source
//! positions into a source map. A node's position is its explicit
//! one when set, otherwise the declaration site of its originating
//! type. Each original file is registered as a source once, with its
//! text content when the database provides it.

use rustc_hash::FxHashMap;
use tygen_common::{SourceMap, SourceMapGenerator};
use tygen_model::TypeDatabase;

use crate::node::{Node, Part};

/// Serialize `root` into the text and source map of `file_name`.
#[must_use]
pub fn serialize(db: &dyn TypeDatabase, file_name: &str, root: &Node) -> (String, SourceMap) {
    let mut serializer = NodeSerializer::new(db, file_name);
    serializer.emit(root);
    serializer.finish()
}

struct NodeSerializer<'a> {
    db: &'a dyn TypeDatabase,
    out: String,
    line: u32,
    column: u32,
    map: SourceMapGenerator,
    source_indices: FxHashMap<String, u32>,
}

impl<'a> NodeSerializer<'a> {
    fn new(db: &'a dyn TypeDatabase, file_name: &str) -> Self {
        Self {
            db,
            out: String::new(),
            line: 0,
            column: 0,
            map: SourceMapGenerator::new(file_name.to_owned()),
            source_indices: FxHashMap::default(),
        }
    }

    fn emit(&mut self, node: &Node) {
        let source = node
            .source()
            .cloned()
            .or_else(|| node.ty().and_then(|ty| self.db.declaration(ty)));
        if let Some(source) = source {
            let source_index = self.source_index(&source.file);
            let name_index = node
                .ty()
                .and_then(|ty| self.db.name(ty))
                .map(|name| self.map.add_name(name));
            self.map.add_mapping(
                self.line,
                self.column,
                source_index,
                source.line,
                source.column,
                name_index,
            );
        }

        for part in node.parts() {
            match part {
                Part::Text(text) => self.write(text),
                Part::Child(child) => self.emit(child),
            }
        }
    }

    fn source_index(&mut self, file: &str) -> u32 {
        if let Some(&index) = self.source_indices.get(file) {
            return index;
        }
        let index = match self.db.source_text(file) {
            Some(content) => self.map.add_source_with_content(file.to_owned(), content),
            None => self.map.add_source(file.to_owned()),
        };
        self.source_indices.insert(file.to_owned(), index);
        index
    }

    fn write(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += u32::try_from(ch.len_utf16()).unwrap_or(0);
            }
        }
        self.out.push_str(text);
    }

    fn finish(self) -> (String, SourceMap) {
        (self.out, self.map.generate())
    }
}
