//! Top-level statement classification
//!
//! Walks the module node's immediate children in source order and assigns
//! each statement a category. Nested bodies are never visited: code inside a
//! function or class travels with its enclosing declaration.

use tree_sitter::Node;

/// Category assigned to one top-level statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    /// Function, async function, or class definition
    Declaration,
    /// Plain or "from" import
    Import,
    /// Simple, annotated, or augmented assignment, or a `global` statement
    Binding,
    /// The conventional `if __name__ == "__main__":` guard
    EntryPoint,
    /// No known category; surfaced as a diagnostic, never a failure
    Unrecognized,
}

/// A top-level statement tagged with its category
///
/// Exists only for the duration of a single segmentation pass and is not
/// exposed outside the engine.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClassifiedStatement<'tree> {
    pub node: Node<'tree>,
    pub category: Category,
}

/// Classify every top-level statement of a parsed module, in source order
pub(crate) fn classify_module<'tree>(
    root: Node<'tree>,
    source: &str,
) -> Vec<ClassifiedStatement<'tree>> {
    let mut cursor = root.walk();
    let mut statements = Vec::new();

    for child in root.named_children(&mut cursor) {
        // Comments are grammar extras, not statements
        if child.kind() == "comment" {
            continue;
        }

        statements.push(ClassifiedStatement {
            node: child,
            category: classify_statement(child, source),
        });
    }

    statements
}

/// Assign a category to a single top-level statement
///
/// The match arms encode a priority: a definition always wins, the
/// entry-point check applies only to `if` statements, and everything
/// unmatched falls through to `Unrecognized`.
fn classify_statement(node: Node, source: &str) -> Category {
    match node.kind() {
        "function_definition" | "class_definition" => Category::Declaration,
        "decorated_definition" => {
            if decorated_definition(node).is_some() {
                Category::Declaration
            } else {
                Category::Unrecognized
            }
        }
        "import_statement" | "import_from_statement" | "future_import_statement" => {
            Category::Import
        }
        "expression_statement" => classify_expression_statement(node),
        "global_statement" => Category::Binding,
        "if_statement" if is_entry_point_guard(node, source) => Category::EntryPoint,
        _ => Category::Unrecognized,
    }
}

/// Classify a top-level expression statement
///
/// `x = 1`, `x: int = 2`, and `x += 1` all parse as an expression_statement
/// wrapping a single assignment node. Any other expression (a docstring, a
/// bare call) is unrecognized.
fn classify_expression_statement(node: Node) -> Category {
    if node.named_child_count() != 1 {
        return Category::Unrecognized;
    }

    match node.named_child(0).map(|child| child.kind()) {
        Some("assignment" | "augmented_assignment") => Category::Binding,
        _ => Category::Unrecognized,
    }
}

/// Resolve the function or class definition wrapped by a decorated statement
pub(crate) fn decorated_definition(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("definition")
        .filter(|definition| {
            matches!(
                definition.kind(),
                "function_definition" | "class_definition"
            )
        })
}

/// Structural match for the conventional script-entry guard
///
/// The condition must be a comparison with exactly one comparator: left
/// operand the identifier `__name__`, operator `==`, right operand a plain
/// string literal `"__main__"`. Reversed operands, extra boolean clauses,
/// other operators, and interpolated strings do not match.
fn is_entry_point_guard(node: Node, source: &str) -> bool {
    let Some(condition) = node.child_by_field_name("condition") else {
        return false;
    };
    if condition.kind() != "comparison_operator" || condition.named_child_count() != 2 {
        return false;
    }

    let mut cursor = condition.walk();
    let operators: Vec<&str> = condition
        .children_by_field_name("operators", &mut cursor)
        .map(|operator| operator.kind())
        .collect();
    if operators != ["=="] {
        return false;
    }

    let (Some(left), Some(right)) = (condition.named_child(0), condition.named_child(1)) else {
        return false;
    };

    left.kind() == "identifier"
        && node_text(left, source) == Some("__name__")
        && string_literal_value(right, source).as_deref() == Some("__main__")
}

/// Extract the value of a plain string literal
///
/// Returns None for f-strings, escapes, and concatenations, which never
/// qualify as the entry-point marker.
fn string_literal_value(node: Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut value = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        match part.kind() {
            "string_start" | "string_end" => {}
            "string_content" => value.push_str(node_text(part, source)?),
            _ => return None,
        }
    }

    Some(value)
}

fn node_text<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}
