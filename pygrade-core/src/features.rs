use tree_sitter::Node;

use crate::parse::ParsedSource;
use crate::types::FeatureCounts;

/// Element count above which a dict/list literal rates as a complex structure.
const COMPLEX_LITERAL_THRESHOLD: usize = 5;

/// Walk the whole tree once and tally structural features.
///
/// Counts only increase; no node kind outside the fixed mapping affects
/// them. The traversal cannot fail.
pub fn extract(parsed: &ParsedSource<'_>) -> FeatureCounts {
    let mut counts = FeatureCounts::default();
    visit(parsed.root(), &mut counts);
    counts
}

fn visit(node: Node<'_>, counts: &mut FeatureCounts) {
    match node.kind() {
        "function_definition" => {
            if is_async(node) {
                // async defs rate as an advanced feature, not a plain function
                counts.advanced_features += 1;
            } else {
                counts.functions += 1;
                if has_docstring(node) {
                    counts.docstrings += 1;
                }
                if is_decorated(node) {
                    counts.decorators += 1;
                }
            }
        }
        "class_definition" => {
            counts.classes += 1;
            if has_docstring(node) {
                counts.docstrings += 1;
            }
            if is_decorated(node) {
                counts.decorators += 1;
            }
        }
        "import_statement" | "import_from_statement" | "future_import_statement" => {
            // one increment per statement, not per imported name
            counts.imports += 1;
        }
        "list_comprehension" | "dictionary_comprehension" | "set_comprehension" => {
            counts.comprehensions += 1;
        }
        "try_statement" => {
            counts.error_handling += 1;
        }
        "set" | "generator_expression" => {
            counts.advanced_types += 1;
        }
        "dictionary" | "list" => {
            if node.named_child_count() > COMPLEX_LITERAL_THRESHOLD {
                counts.complex_structures += 1;
            }
        }
        "await" => {
            // the anonymous `await` keyword token shares the named node's kind
            if node.is_named() {
                counts.advanced_features += 1;
            }
        }
        "for_statement" | "with_statement" => {
            if is_async(node) {
                counts.advanced_features += 1;
            }
        }
        "yield" => {
            if is_yield_from(node) {
                counts.advanced_features += 1;
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, counts);
    }
}

/// Whether a definition or statement carries the `async` keyword.
fn is_async(node: Node<'_>) -> bool {
    node.child(0).is_some_and(|c| c.kind() == "async")
}

/// Whether a definition sits under a `decorated_definition` wrapper.
fn is_decorated(node: Node<'_>) -> bool {
    node.parent()
        .is_some_and(|p| p.kind() == "decorated_definition")
}

/// `yield from ...` as opposed to a plain `yield`.
fn is_yield_from(node: Node<'_>) -> bool {
    node.child(1).is_some_and(|c| c.kind() == "from")
}

/// Whether the first statement of a definition body is a bare string literal.
pub(crate) fn has_docstring(def: Node<'_>) -> bool {
    let Some(body) = def.child_by_field_name("body") else {
        return false;
    };
    let Some(first) = body.named_child(0) else {
        return false;
    };
    if first.kind() != "expression_statement" {
        return false;
    }
    first.named_child(0).is_some_and(|e| e.kind() == "string")
}
