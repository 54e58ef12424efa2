//! Python grammar integration built on tree-sitter
//!
//! tree-sitter is error-tolerant and will happily produce a tree containing
//! ERROR or MISSING nodes for malformed input. Segmentation requires a fully
//! valid module, so parsing rejects any tree containing an error node and
//! reports the position of the first one.

use crate::error::ParseError;
use tree_sitter::{Language, Node, Parser, Tree};

/// Parser for Python source text
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new parser with the Python grammar loaded
    pub fn new() -> Result<Self, ParseError> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| ParseError::Grammar(e.to_string()))?;

        Ok(Self { parser })
    }

    /// Parse source text into a syntax tree
    ///
    /// Fails with [`ParseError::InvalidSyntax`] when the text does not
    /// conform to the Python grammar. Performs no semantic validation.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::NoTree)?;

        let root = tree.root_node();
        if root.has_error() {
            let position = first_error_node(root)
                .map(|node| node.start_position())
                .unwrap_or_else(|| root.start_position());
            return Err(ParseError::InvalidSyntax {
                line: position.row + 1,
                column: position.column + 1,
            });
        }

        Ok(tree)
    }
}

/// Find the first ERROR or MISSING node in document order
fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    None
}
