//! Chunk construction and cross-cutting aggregation
//!
//! Declarations and the entry-point block become chunks immediately, in
//! encounter order. Imports and bindings accumulate into two local buffers
//! that flush into one aggregate chunk each at the end of the pass, bindings
//! before imports.

use super::classifier::{Category, ClassifiedStatement, decorated_definition};
use super::{
    Chunk, ChunkKind, Diagnostic, ENTRY_POINT_CHUNK_NAME, GLOBALS_CHUNK_NAME, IMPORTS_CHUNK_NAME,
    Segmentation,
};
use tree_sitter::Node;

/// Sentinel line number for aggregate chunks, whose constituent statements
/// are not contiguous in the source
const AGGREGATE_LINE: usize = 0;

pub(crate) struct ChunkBuilder<'a> {
    source: &'a str,
    file_name: &'a str,
    chunks: Vec<Chunk>,
    bindings: Vec<&'a str>,
    imports: Vec<&'a str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ChunkBuilder<'a> {
    pub(crate) fn new(source: &'a str, file_name: &'a str) -> Self {
        Self {
            source,
            file_name,
            chunks: Vec::new(),
            bindings: Vec::new(),
            imports: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, statement: ClassifiedStatement<'_>) {
        match statement.category {
            Category::Declaration => self.push_declaration(statement.node),
            Category::EntryPoint => self.push_entry_point(statement.node),
            Category::Import => self.buffer_import(statement.node),
            Category::Binding => self.buffer_binding(statement.node),
            Category::Unrecognized => self.push_unrecognized(statement.node),
        }
    }

    /// Flush the aggregation buffers and hand the result to the caller
    pub(crate) fn finish(mut self) -> Segmentation {
        if !self.bindings.is_empty() {
            self.chunks.push(Chunk {
                kind: ChunkKind::Binding,
                name: GLOBALS_CHUNK_NAME.to_string(),
                source_text: self.bindings.join("\n"),
                file_name: self.file_name.to_string(),
                start_line: AGGREGATE_LINE,
                end_line: AGGREGATE_LINE,
            });
        }

        if !self.imports.is_empty() {
            self.chunks.push(Chunk {
                kind: ChunkKind::Import,
                name: IMPORTS_CHUNK_NAME.to_string(),
                source_text: self.imports.join("\n"),
                file_name: self.file_name.to_string(),
                start_line: AGGREGATE_LINE,
                end_line: AGGREGATE_LINE,
            });
        }

        Segmentation {
            chunks: self.chunks,
            diagnostics: self.diagnostics,
        }
    }

    fn push_declaration(&mut self, node: Node) {
        match self.build_declaration(node) {
            Ok(chunk) => self.chunks.push(chunk),
            Err(reason) => self.skip_statement(node, reason),
        }
    }

    fn build_declaration(&self, node: Node) -> Result<Chunk, String> {
        let name = declaration_name(node, self.source)?;
        let source_text = strip_blank_lines(node_source(node, self.source)?);

        Ok(Chunk {
            kind: ChunkKind::Declaration,
            name,
            source_text,
            file_name: self.file_name.to_string(),
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
        })
    }

    fn push_entry_point(&mut self, node: Node) {
        match node_source(node, self.source) {
            Ok(text) => self.chunks.push(Chunk {
                kind: ChunkKind::EntryPointBlock,
                name: ENTRY_POINT_CHUNK_NAME.to_string(),
                source_text: strip_blank_lines(text),
                file_name: self.file_name.to_string(),
                start_line: node.start_position().row + 1,
                end_line: node.end_position().row + 1,
            }),
            Err(reason) => self.skip_statement(node, reason),
        }
    }

    fn buffer_import(&mut self, node: Node<'_>) {
        match node_source(node, self.source) {
            Ok(text) => self.imports.push(text),
            Err(reason) => self.skip_statement(node, reason),
        }
    }

    fn buffer_binding(&mut self, node: Node<'_>) {
        match node_source(node, self.source) {
            Ok(text) => self.bindings.push(text),
            Err(reason) => self.skip_statement(node, reason),
        }
    }

    fn push_unrecognized(&mut self, node: Node) {
        let construct = node.kind().to_string();
        let line = node.start_position().row + 1;
        tracing::warn!("Skipping top-level node of kind {} at line {}", construct, line);
        self.diagnostics
            .push(Diagnostic::UnrecognizedConstruct { construct, line });
    }

    /// Skip-and-diagnose: one broken statement never aborts the whole file
    fn skip_statement(&mut self, node: Node, reason: String) {
        let line = node.start_position().row + 1;
        tracing::warn!("Skipping statement at line {}: {}", line, reason);
        self.diagnostics
            .push(Diagnostic::SkippedStatement { line, reason });
    }
}

/// Resolve the declared identifier of a definition node
///
/// For decorated statements the name lives on the wrapped definition, while
/// the span (and source text) stays with the wrapper so decorators are
/// included.
fn declaration_name(node: Node, source: &str) -> Result<String, String> {
    let definition = if node.kind() == "decorated_definition" {
        decorated_definition(node)
            .ok_or_else(|| "decorated statement wraps no definition".to_string())?
    } else {
        node
    };

    let name_node = definition
        .child_by_field_name("name")
        .ok_or_else(|| format!("{} has no name field", definition.kind()))?;

    Ok(node_source(name_node, source)?.to_string())
}

fn node_source<'a>(node: Node, source: &'a str) -> Result<&'a str, String> {
    source
        .get(node.start_byte()..node.end_byte())
        .ok_or_else(|| format!("{} spans an invalid byte range", node.kind()))
}

/// Drop fully blank lines, keeping everything else byte-for-byte
fn strip_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
