//! Advisory pass producing improvement suggestions.
//!
//! Runs a fixed sequence of independent checks: raw-text style checks
//! first, then tree-based checks. Suggestion order follows check order,
//! not line order.

use std::collections::BTreeSet;

use tracing::debug;
use tree_sitter::Node;

use crate::config::StyleSection;
use crate::features::has_docstring;
use crate::parse::{self, ParseOutcome, ParsedSource};
use crate::types::{PythonVersion, Suggestion, SuggestionCategory};

/// Produce improvement suggestions for a submission.
///
/// Intended to be called after validation reported the text as parsable;
/// on unparsable input the tree-based checks degrade to a single `Info`
/// suggestion, as does any internal fault.
pub fn suggest_improvements(source: &str, style: &StyleSection) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    check_long_lines(source, style, &mut suggestions);
    check_mixed_indentation(source, &mut suggestions);

    match parse::parse(source, PythonVersion::default()) {
        ParseOutcome::Parsed(parsed) => {
            check_missing_docstrings(&parsed, &mut suggestions);
            check_mutable_defaults(&parsed, &mut suggestions);
            check_bare_excepts(&parsed, &mut suggestions);
            check_unused_imports(&parsed, &mut suggestions);
        }
        ParseOutcome::SyntaxError(info) => {
            debug!(line = info.line, "Suggestion pass degraded to style checks");
            suggestions.push(Suggestion {
                line: 1,
                message: format!("Could not complete full code analysis: {}", info.message),
                category: SuggestionCategory::Info,
            });
        }
        ParseOutcome::Fault(message) => {
            suggestions.push(Suggestion {
                line: 1,
                message: format!("Could not complete full code analysis: {message}"),
                category: SuggestionCategory::Info,
            });
        }
    }

    suggestions
}

// ── Raw-text checks ────────────────────────────────────────────────

fn check_long_lines(source: &str, style: &StyleSection, out: &mut Vec<Suggestion>) {
    for (i, line) in source.split('\n').enumerate() {
        let length = line.chars().count();
        if length > style.max_line_length {
            out.push(Suggestion {
                line: i + 1,
                message: format!(
                    "Line {} is too long ({length} characters). Consider breaking it into multiple lines.",
                    i + 1
                ),
                category: SuggestionCategory::Style,
            });
        }
    }
}

fn check_mixed_indentation(source: &str, out: &mut Vec<Suggestion>) {
    // reported against line 1, not the offending line
    if source.contains('\t') && source.contains("    ") {
        out.push(Suggestion {
            line: 1,
            message: "Mixed use of tabs and spaces detected. Stick to using either tabs or \
                      spaces for indentation."
                .to_string(),
            category: SuggestionCategory::Style,
        });
    }
}

// ── Tree-based checks ──────────────────────────────────────────────

fn check_missing_docstrings(parsed: &ParsedSource<'_>, out: &mut Vec<Suggestion>) {
    for_each_function(parsed.root(), &mut |def| {
        if !has_docstring(def) {
            let name = function_name(def, parsed.source);
            out.push(Suggestion {
                line: def.start_position().row + 1,
                message: format!("Function '{name}' is missing a docstring."),
                category: SuggestionCategory::Documentation,
            });
        }
    });
}

fn check_mutable_defaults(parsed: &ParsedSource<'_>, out: &mut Vec<Suggestion>) {
    for_each_function(parsed.root(), &mut |def| {
        let Some(params) = def.child_by_field_name("parameters") else {
            return;
        };
        let mut cursor = params.walk();
        for param in params.children(&mut cursor) {
            if !matches!(param.kind(), "default_parameter" | "typed_default_parameter") {
                continue;
            }
            let Some(value) = param.child_by_field_name("value") else {
                continue;
            };
            if matches!(value.kind(), "list" | "dictionary" | "set") {
                let name = function_name(def, parsed.source);
                out.push(Suggestion {
                    line: def.start_position().row + 1,
                    message: format!(
                        "Function '{name}' uses a mutable default argument, which can lead \
                         to unexpected behavior."
                    ),
                    category: SuggestionCategory::Warning,
                });
            }
        }
    });
}

fn check_bare_excepts(parsed: &ParsedSource<'_>, out: &mut Vec<Suggestion>) {
    walk(parsed.root(), &mut |node| {
        // a bare handler has no exception type: its only named child is the body
        if node.kind() == "except_clause" && node.named_child_count() == 1 {
            out.push(Suggestion {
                line: node.start_position().row + 1,
                message: "Bare except clause found. It's better to specify which exceptions \
                          to catch."
                    .to_string(),
                category: SuggestionCategory::Warning,
            });
        }
    });
}

fn check_unused_imports(parsed: &ParsedSource<'_>, out: &mut Vec<Suggestion>) {
    let mut imported = BTreeSet::new();
    collect_imported_names(parsed.root(), parsed.source, &mut imported);

    let mut used = BTreeSet::new();
    collect_used_names(parsed.root(), parsed.source, &mut used);

    for name in imported.iter().filter(|n| !used.contains(*n)) {
        // import statements do not track per-name lines; report line 1
        out.push(Suggestion {
            line: 1,
            message: format!("Unused import: '{name}'"),
            category: SuggestionCategory::Warning,
        });
    }
}

/// Names bound by import statements.
///
/// For `import x.y` the tracked name is the full dotted path and any alias
/// is ignored; for `from m import y as z` it is the alias when present.
fn collect_imported_names(node: Node<'_>, source: &str, imported: &mut BTreeSet<String>) {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "dotted_name" => {
                        imported.insert(text(child, source).to_string());
                    }
                    "aliased_import" => {
                        if let Some(name) = child.child_by_field_name("name") {
                            imported.insert(text(name, source).to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        "import_from_statement" | "future_import_statement" => {
            // skip the module_name field so `from os import path` tracks
            // only `path`
            let module_id = node.child_by_field_name("module_name").map(|n| n.id());
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if Some(child.id()) == module_id {
                    continue;
                }
                match child.kind() {
                    "dotted_name" => {
                        imported.insert(text(child, source).to_string());
                    }
                    "aliased_import" => {
                        let name = child
                            .child_by_field_name("alias")
                            .or_else(|| child.child_by_field_name("name"));
                        if let Some(name) = name {
                            imported.insert(text(name, source).to_string());
                        }
                    }
                    "wildcard_import" => {
                        imported.insert("*".to_string());
                    }
                    _ => {}
                }
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_imported_names(child, source, imported);
            }
        }
    }
}

/// Identifier references anywhere outside import statements.
///
/// Attribute access only counts the object side (`os.path` uses `os`),
/// definition names do not count as uses of themselves, and parameter
/// names bind rather than use (their annotations and defaults still
/// count).
fn collect_used_names(node: Node<'_>, source: &str, used: &mut BTreeSet<String>) {
    match node.kind() {
        "import_statement" | "import_from_statement" | "future_import_statement" => {}
        "identifier" => {
            used.insert(text(node, source).to_string());
        }
        "attribute" => {
            if let Some(object) = node.child_by_field_name("object") {
                collect_used_names(object, source, used);
            }
        }
        "function_definition" | "class_definition" | "lambda" => {
            let name_id = node.child_by_field_name("name").map(|n| n.id());
            let params_id = node.child_by_field_name("parameters").map(|n| n.id());
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if Some(child.id()) == name_id {
                    continue;
                }
                if Some(child.id()) == params_id {
                    collect_parameter_uses(child, source, used);
                } else {
                    collect_used_names(child, source, used);
                }
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_used_names(child, source, used);
            }
        }
    }
}

/// Walk a parameter list, counting only annotations and default values.
fn collect_parameter_uses(params: Node<'_>, source: &str, used: &mut BTreeSet<String>) {
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {}
            "typed_parameter" | "default_parameter" | "typed_default_parameter" => {
                if let Some(ty) = param.child_by_field_name("type") {
                    collect_used_names(ty, source, used);
                }
                if let Some(value) = param.child_by_field_name("value") {
                    collect_used_names(value, source, used);
                }
            }
            _ => collect_used_names(param, source, used),
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn walk<'t>(node: Node<'t>, f: &mut impl FnMut(Node<'t>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, f);
    }
}

/// Visit every non-async function definition in the tree.
fn for_each_function<'t>(root: Node<'t>, f: &mut impl FnMut(Node<'t>)) {
    walk(root, &mut |node| {
        if node.kind() == "function_definition"
            && !node.child(0).is_some_and(|c| c.kind() == "async")
        {
            f(node);
        }
    });
}

fn function_name<'a>(def: Node<'_>, source: &'a str) -> &'a str {
    def.child_by_field_name("name")
        .map_or("<anonymous>", |n| text(n, source))
}

fn text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggest(source: &str) -> Vec<Suggestion> {
        suggest_improvements(source, &StyleSection::default())
    }

    fn of_category(
        suggestions: &[Suggestion],
        category: SuggestionCategory,
    ) -> Vec<&Suggestion> {
        suggestions
            .iter()
            .filter(|s| s.category == category)
            .collect()
    }

    #[test]
    fn long_line_reports_line_number_and_length() {
        let source = format!("x = 1\ny = \"{}\"\n", "a".repeat(84));
        let suggestions = suggest(&source);
        let style = of_category(&suggestions, SuggestionCategory::Style);
        assert_eq!(style.len(), 1);
        assert_eq!(style[0].line, 2);
        assert!(style[0].message.contains("90 characters"), "{}", style[0].message);
    }

    #[test]
    fn mixed_indentation_reported_against_line_one() {
        let source = "def f():\n\tx = 1\n\ndef g():\n    y = 2\n";
        let suggestions = suggest(source);
        let style = of_category(&suggestions, SuggestionCategory::Style);
        assert_eq!(style.len(), 1);
        assert_eq!(style[0].line, 1);
        assert!(style[0].message.contains("tabs and spaces"));
    }

    #[test]
    fn missing_docstring_names_the_function() {
        let source = "def soma(a, b):\n    return a + b\n";
        let suggestions = suggest(source);
        let docs = of_category(&suggestions, SuggestionCategory::Documentation);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].line, 1);
        assert!(docs[0].message.contains("'soma'"));
    }

    #[test]
    fn documented_function_passes() {
        let source = "def soma(a, b):\n    \"\"\"Add.\"\"\"\n    return a + b\n";
        let suggestions = suggest(source);
        assert!(of_category(&suggestions, SuggestionCategory::Documentation).is_empty());
    }

    #[test]
    fn mutable_default_argument_warns() {
        let source = "def extend(items=[]):\n    \"\"\"Doc.\"\"\"\n    return items\n";
        let suggestions = suggest(source);
        let warnings = of_category(&suggestions, SuggestionCategory::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'extend'"));
        assert!(warnings[0].message.contains("mutable default"));
    }

    #[test]
    fn typed_dict_default_also_warns() {
        let source = "def merge(extra: dict = {}):\n    \"\"\"Doc.\"\"\"\n    return extra\n";
        let suggestions = suggest(source);
        let warnings = of_category(&suggestions, SuggestionCategory::Warning);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn bare_except_warns_at_handler_line() {
        let source = "try:\n    pass\nexcept:\n    pass\n";
        let suggestions = suggest(source);
        let warnings = of_category(&suggestions, SuggestionCategory::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 3);
        assert!(warnings[0].message.contains("Bare except"));
    }

    #[test]
    fn typed_except_passes() {
        let source = "try:\n    pass\nexcept ValueError:\n    pass\n";
        let suggestions = suggest(source);
        assert!(of_category(&suggestions, SuggestionCategory::Warning).is_empty());
    }

    #[test]
    fn unused_import_reported_at_line_one() {
        let source = "import os\nimport sys\n\nprint(sys.argv)\n";
        let suggestions = suggest(source);
        let warnings = of_category(&suggestions, SuggestionCategory::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 1);
        assert!(warnings[0].message.contains("'os'"));
    }

    #[test]
    fn from_import_alias_tracks_the_bound_name() {
        let source = "from pathlib import Path as P\n\nprint(P('.'))\n";
        let suggestions = suggest(source);
        assert!(of_category(&suggestions, SuggestionCategory::Warning).is_empty());

        let unused = "from pathlib import Path as P\n\nprint('hi')\n";
        let suggestions = suggest(unused);
        let warnings = of_category(&suggestions, SuggestionCategory::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'P'"));
    }

    #[test]
    fn plain_import_alias_is_ignored_when_tracking() {
        // `import numpy as np` tracks the module name, so using the alias
        // still leaves 'numpy' flagged
        let source = "import numpy as np\n\nprint(np.zeros(3))\n";
        let suggestions = suggest(source);
        let warnings = of_category(&suggestions, SuggestionCategory::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'numpy'"));
    }

    #[test]
    fn parameter_name_shadowing_an_import_is_not_a_use() {
        let source = "import os\n\ndef f(os):\n    \"\"\"Doc.\"\"\"\n    pass\n";
        let suggestions = suggest(source);
        let warnings = of_category(&suggestions, SuggestionCategory::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'os'"));
    }

    #[test]
    fn parameter_annotations_and_defaults_count_as_uses() {
        let source = "import os\nfrom pathlib import Path\n\n\
                      def f(p: Path = os.curdir):\n    \"\"\"Doc.\"\"\"\n    return p\n";
        let suggestions = suggest(source);
        assert!(of_category(&suggestions, SuggestionCategory::Warning).is_empty());
    }

    #[test]
    fn unparsable_input_degrades_to_info() {
        let suggestions = suggest("def f(:\n  pass");
        let info = of_category(&suggestions, SuggestionCategory::Info);
        assert_eq!(info.len(), 1);
        assert!(info[0].message.contains("Could not complete full code analysis"));
    }

    #[test]
    fn check_order_is_stable() {
        let long = "b".repeat(95);
        let source = format!("import os\ndef f():\n    x = \"{long}\"\n");
        let suggestions = suggest(&source);
        let categories: Vec<_> = suggestions.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                SuggestionCategory::Style,
                SuggestionCategory::Documentation,
                SuggestionCategory::Warning,
            ]
        );
    }
}
