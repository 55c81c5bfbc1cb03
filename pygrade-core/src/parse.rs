use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

use crate::types::PythonVersion;

/// Structured descriptor of a syntax error: human-readable message plus the
/// 1-based line of the first offending node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    pub message: String,
    pub line: i64,
}

/// A successfully parsed submission. The tree is only valid together with
/// the source it was parsed from.
#[derive(Debug)]
pub struct ParsedSource<'a> {
    pub tree: Tree,
    pub source: &'a str,
}

impl ParsedSource<'_> {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// Outcome of handing raw text to the parser.
#[derive(Debug)]
pub enum ParseOutcome<'a> {
    /// The text is syntactically valid.
    Parsed(ParsedSource<'a>),
    /// The text is not valid Python; a descriptor locates the error.
    SyntaxError(SyntaxErrorInfo),
    /// The parser itself failed. Treated like a syntax error for scoring,
    /// but without a line number.
    Fault(String),
}

/// Parse raw text with the tree-sitter Python grammar.
///
/// The version hint selects leniency only; the grammar accepts both dialect
/// families, so the hint does not alter the outcome shape. Callers are
/// expected to have short-circuited empty input before parsing.
pub fn parse(source: &str, version: PythonVersion) -> ParseOutcome<'_> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
        warn!(error = %e, "Failed to load Python grammar");
        return ParseOutcome::Fault(format!("unexpected parser error: {e}"));
    }

    let Some(tree) = parser.parse(source, None) else {
        warn!("Parser returned no tree");
        return ParseOutcome::Fault("unexpected parser error: parser produced no tree".to_string());
    };

    if tree.root_node().has_error() {
        let info = locate_first_error(tree.root_node());
        debug!(line = info.line, version = version.as_str(), "Syntax error");
        return ParseOutcome::SyntaxError(info);
    }

    ParseOutcome::Parsed(ParsedSource { tree, source })
}

/// Find the first `ERROR` or missing node and describe it.
fn locate_first_error(root: Node<'_>) -> SyntaxErrorInfo {
    let mut best: Option<(usize, String)> = None;
    collect_errors(root, &mut best);

    match best {
        Some((row, message)) => SyntaxErrorInfo {
            message,
            line: (row + 1) as i64,
        },
        // has_error() was true but no concrete node found; report without a line
        None => SyntaxErrorInfo {
            message: "invalid syntax".to_string(),
            line: -1,
        },
    }
}

fn collect_errors(node: Node<'_>, best: &mut Option<(usize, String)>) {
    if node.is_error() || node.is_missing() {
        let row = node.start_position().row;
        if best.as_ref().is_none_or(|(r, _)| row < *r) {
            let message = if node.is_missing() {
                format!("invalid syntax: missing {} at line {}", node.kind(), row + 1)
            } else {
                format!("invalid syntax at line {}", row + 1)
            };
            *best = Some((row, message));
        }
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, best);
    }
}
