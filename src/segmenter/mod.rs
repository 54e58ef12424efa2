//! Declaration-level segmentation of Python source files
//!
//! Turns the text of one source file into an ordered sequence of
//! self-contained chunks: one per top-level function, async function, or
//! class, one for the conventional `if __name__ == "__main__":` block, plus
//! two synthetic aggregates collecting all imports and all top-level
//! variable bindings. Each invocation recomputes the full sequence from
//! scratch; no state carries across files.

mod builder;
mod classifier;
mod parser;

pub use parser::PythonParser;

use crate::error::SegmenterError;
use builder::ChunkBuilder;
use classifier::classify_module;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Display name of the aggregate chunk collecting top-level bindings
pub const GLOBALS_CHUNK_NAME: &str = "Global variables";

/// Display name of the aggregate chunk collecting import statements
pub const IMPORTS_CHUNK_NAME: &str = "Imports";

/// Display name of the script-entry block chunk
pub const ENTRY_POINT_CHUNK_NAME: &str = "Entry point";

/// The category a chunk belongs to, driving downstream handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChunkKind {
    Declaration,
    Import,
    Binding,
    EntryPointBlock,
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChunkKind::Declaration => "declaration",
            ChunkKind::Import => "import",
            ChunkKind::Binding => "binding",
            ChunkKind::EntryPointBlock => "entry-point",
        };
        f.write_str(label)
    }
}

/// One unit of segmented output
///
/// Chunks are created once per engine invocation and handed to the caller
/// by value; the engine holds no reference to them afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Category of this chunk
    pub kind: ChunkKind,
    /// Display name: the declared identifier, or a fixed label for
    /// aggregates and the entry-point block
    pub name: String,
    /// Extracted source for this unit. Declarations and the entry-point
    /// block have fully blank lines removed; aggregates keep the original
    /// line breaks, one statement per line.
    pub source_text: String,
    /// Base name of the originating file (not a path)
    pub file_name: String,
    /// 1-based inclusive start line; 0 for aggregate chunks
    pub start_line: usize,
    /// 1-based inclusive end line; 0 for aggregate chunks
    pub end_line: usize,
}

/// Non-fatal per-statement report accompanying a successful segmentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A top-level statement that matched no known category
    UnrecognizedConstruct { construct: String, line: usize },
    /// A statement whose source text could not be extracted; it was dropped
    /// from the output rather than failing the whole file
    SkippedStatement { line: usize, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedConstruct { construct, line } => {
                write!(f, "unrecognized top-level construct `{construct}` at line {line}")
            }
            Diagnostic::SkippedStatement { line, reason } => {
                write!(f, "skipped statement at line {line}: {reason}")
            }
        }
    }
}

/// Result of segmenting one source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// Chunks in source order, aggregates last
    pub chunks: Vec<Chunk>,
    /// Non-fatal reports produced during the pass
    pub diagnostics: Vec<Diagnostic>,
}

/// Segmentation engine holding a configured parser
///
/// Calls are independent: segmenting many files in sequence through one
/// `Segmenter` yields exactly the same output as a fresh engine per file.
pub struct Segmenter {
    parser: PythonParser,
}

impl Segmenter {
    pub fn new() -> Result<Self, SegmenterError> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }

    /// Segment one source file into an ordered chunk sequence
    ///
    /// Fails with a parse error for syntactically invalid input, returning
    /// no partial result.
    pub fn segment(
        &mut self,
        source: &str,
        file_name: &str,
    ) -> Result<Segmentation, SegmenterError> {
        let tree = self.parser.parse(source)?;

        let mut builder = ChunkBuilder::new(source, file_name);
        for statement in classify_module(tree.root_node(), source) {
            builder.push(statement);
        }

        Ok(builder.finish())
    }
}

/// Segment source text with a fresh engine
pub fn segment(source: &str, file_name: &str) -> Result<Segmentation, SegmenterError> {
    Segmenter::new()?.segment(source, file_name)
}

/// Read a file and segment it, deriving the chunk file name from the path's
/// base name
pub fn segment_file(path: impl AsRef<Path>) -> Result<Segmentation, SegmenterError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown");

    segment(&source, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_simple_module() {
        let segmentation = segment("def f():\n    return 1\n", "test.py").unwrap();
        assert_eq!(segmentation.chunks.len(), 1);
        assert_eq!(segmentation.chunks[0].kind, ChunkKind::Declaration);
        assert_eq!(segmentation.chunks[0].name, "f");
    }

    #[test]
    fn test_segmenter_is_stateless_across_files() {
        let mut segmenter = Segmenter::new().unwrap();
        let first = segmenter.segment("import os\n", "a.py").unwrap();
        let second = segmenter.segment("x = 1\n", "b.py").unwrap();

        // Nothing from the first file leaks into the second
        assert_eq!(first.chunks.len(), 1);
        assert_eq!(first.chunks[0].name, IMPORTS_CHUNK_NAME);
        assert_eq!(second.chunks.len(), 1);
        assert_eq!(second.chunks[0].name, GLOBALS_CHUNK_NAME);
    }

    #[test]
    fn test_chunk_kind_display() {
        assert_eq!(ChunkKind::Declaration.to_string(), "declaration");
        assert_eq!(ChunkKind::EntryPointBlock.to_string(), "entry-point");
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::UnrecognizedConstruct {
            construct: "while_statement".to_string(),
            line: 4,
        };
        assert_eq!(
            diagnostic.to_string(),
            "unrecognized top-level construct `while_statement` at line 4"
        );
    }

    #[test]
    fn test_chunk_serializes_to_json() {
        let chunk = Chunk {
            kind: ChunkKind::Declaration,
            name: "f".to_string(),
            source_text: "def f():\n    return 1".to_string(),
            file_name: "test.py".to_string(),
            start_line: 1,
            end_line: 2,
        };

        let json = serde_json::to_string(&chunk).unwrap();
        let restored: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(chunk, restored);
    }
}
