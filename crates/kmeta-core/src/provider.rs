//! Declaration tree provider: header discovery and C++ parsing.
//!
//! Wraps the tree-sitter C++ grammar behind the small surface the collector
//! needs: one parsed tree per header plus a list of diagnostics. Parsing is
//! best-effort: a tree with syntax errors is still returned and traversed
//! with whatever structure was recovered.
//!
//! tree-sitter does not evaluate preprocessor conditionals, so the provider
//! runs a minimal line-based conditional-inclusion pass first. Only
//! conditionals that reference a configured define (by default
//! `KMETA_PROCESSING=1`) are resolved; everything else is left to the
//! grammar, which parses all branches. This lets instrumented headers branch
//! on being processed by this tool, the same way the original front end's
//! `-DKMETA_PROCESSING=1` flag did.

use std::fs;
use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser, Tree};

use crate::error::{MetaError, MetaResult};

/// Preprocessor define signaling that a header is being processed by kmeta.
pub const PROCESSING_DEFINE: &str = "KMETA_PROCESSING";

/// Diagnostics reported per file are capped to keep logs readable.
const MAX_DIAGNOSTICS_PER_FILE: usize = 20;

/// Options controlling how headers are parsed.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Preprocessor defines resolved by the conditional-inclusion pass.
    pub defines: Vec<(String, String)>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            defines: vec![(PROCESSING_DEFINE.to_string(), "1".to_string())],
        }
    }
}

/// Severity of a front-end diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Note,
    Warning,
    Error,
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// A single front-end diagnostic. Informational only: diagnostics never
/// abort a run.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based line in the source file.
    pub line: usize,
}

/// One parsed translation unit.
pub struct ParsedUnit {
    pub path: PathBuf,
    /// Source text after conditional inclusion; node byte ranges index into
    /// this, not the on-disk file.
    pub source: String,
    pub tree: Tree,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedUnit {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text of a node in this unit. Nodes always come from `self.tree`, so
    /// their ranges are valid for `self.source`.
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Find all `**/*.h` headers under `root`, sorted for deterministic runs.
pub fn discover_headers(root: &Path) -> MetaResult<Vec<PathBuf>> {
    let pattern = root.join("**").join("*.h");
    let mut headers: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .flatten()
        .collect();
    headers.sort();
    Ok(headers)
}

/// Parse one header file.
pub fn parse_file(path: &Path, options: &ParseOptions) -> MetaResult<ParsedUnit> {
    let source = fs::read_to_string(path).map_err(|source| MetaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(&source, path, options)
}

/// Parse C++ source text as if read from `path`.
pub fn parse_source(source: &str, path: &Path, options: &ParseOptions) -> MetaResult<ParsedUnit> {
    let resolved = resolve_conditionals(source, &options.defines);

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_cpp::LANGUAGE.into())
        .map_err(|_| MetaError::Parse {
            path: path.to_path_buf(),
        })?;

    let tree = parser
        .parse(resolved.as_bytes(), None)
        .ok_or_else(|| MetaError::Parse {
            path: path.to_path_buf(),
        })?;

    let diagnostics = collect_diagnostics(&tree, resolved.as_bytes());
    for diagnostic in &diagnostics {
        tracing::warn!(
            "{}:{}: {}: {}",
            path.display(),
            diagnostic.line,
            diagnostic.severity,
            diagnostic.message
        );
    }

    Ok(ParsedUnit {
        path: path.to_path_buf(),
        source: resolved,
        tree,
        diagnostics,
    })
}

/// Walk the tree for ERROR and missing nodes. Subtrees without errors are
/// skipped wholesale.
fn collect_diagnostics(tree: &Tree, source: &[u8]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    visit_errors(tree.root_node(), source, &mut diagnostics);
    diagnostics
}

fn visit_errors(node: Node<'_>, source: &[u8], out: &mut Vec<Diagnostic>) {
    if out.len() >= MAX_DIAGNOSTICS_PER_FILE || !node.has_error() {
        return;
    }

    let line = node.start_position().row + 1;
    if node.is_error() {
        let snippet = node.utf8_text(source).unwrap_or("");
        let snippet: String = snippet.chars().take(40).collect();
        out.push(Diagnostic {
            severity: Severity::Error,
            message: format!("syntax error near `{}`", snippet.trim()),
            line,
        });
        return;
    }
    if node.is_missing() {
        out.push(Diagnostic {
            severity: Severity::Error,
            message: format!("missing `{}`", node.kind()),
            line,
        });
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_errors(child, source, out);
    }
}

// --- conditional inclusion ---------------------------------------------

struct Frame {
    /// Whether this pass resolves the conditional. Untracked frames are
    /// left intact for the grammar.
    tracked: bool,
    /// Lines in the current branch are kept.
    emitting: bool,
    /// A branch has already been taken (controls #elif / #else).
    taken: bool,
}

/// Resolve `#if`/`#ifdef` conditionals that reference a known define.
/// Suppressed lines are blanked rather than removed so line numbers in
/// diagnostics stay aligned with the on-disk file.
fn resolve_conditionals(source: &str, defines: &[(String, String)]) -> String {
    let mut frames: Vec<Frame> = Vec::new();
    let mut output = String::with_capacity(source.len());

    for line in source.lines() {
        let emitting = frames.iter().all(|f| f.emitting);
        let directive = parse_directive(line);

        match directive {
            Some(Directive::If {
                condition,
                negate,
                defined_test,
            }) => {
                if !emitting {
                    // Nested inside a suppressed region: suppress entirely.
                    frames.push(Frame {
                        tracked: true,
                        emitting: false,
                        taken: true,
                    });
                    output.push('\n');
                } else if let Some(value) = eval_condition(condition, negate, defined_test, defines) {
                    frames.push(Frame {
                        tracked: true,
                        emitting: value,
                        taken: value,
                    });
                    output.push('\n');
                } else {
                    frames.push(Frame {
                        tracked: false,
                        emitting: true,
                        taken: true,
                    });
                    output.push_str(line);
                    output.push('\n');
                }
            }
            Some(Directive::Elif(condition)) => match frames.last_mut() {
                Some(frame) if frame.tracked => {
                    if frame.taken {
                        frame.emitting = false;
                    } else {
                        let value =
                            eval_condition(condition, false, false, defines).unwrap_or(false);
                        frame.emitting = value;
                        frame.taken = value;
                    }
                    output.push('\n');
                }
                _ => {
                    output.push_str(line);
                    output.push('\n');
                }
            },
            Some(Directive::Else) => match frames.last_mut() {
                Some(frame) if frame.tracked => {
                    frame.emitting = !frame.taken;
                    frame.taken = true;
                    output.push('\n');
                }
                _ => {
                    output.push_str(line);
                    output.push('\n');
                }
            },
            Some(Directive::Endif) => match frames.pop() {
                Some(frame) if frame.tracked => output.push('\n'),
                _ => {
                    // Untracked (or unbalanced): keep the directive for the
                    // grammar.
                    output.push_str(line);
                    output.push('\n');
                }
            },
            None => {
                if emitting {
                    output.push_str(line);
                }
                output.push('\n');
            }
        }
    }

    output
}

enum Directive<'a> {
    If {
        condition: &'a str,
        negate: bool,
        defined_test: bool,
    },
    Elif(&'a str),
    Else,
    Endif,
}

/// The argument of a directive line, if the line is `#<keyword> ...`.
fn keyword_arg<'a>(rest: &'a str, keyword: &str) -> Option<&'a str> {
    let tail = rest.strip_prefix(keyword)?;
    if tail.is_empty() || tail.starts_with(char::is_whitespace) || tail.starts_with('(') {
        Some(tail.trim())
    } else {
        None
    }
}

fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix('#')?.trim_start();

    if let Some(condition) = keyword_arg(rest, "ifdef") {
        return Some(Directive::If {
            condition,
            negate: false,
            defined_test: true,
        });
    }
    if let Some(condition) = keyword_arg(rest, "ifndef") {
        return Some(Directive::If {
            condition,
            negate: true,
            defined_test: true,
        });
    }
    if let Some(condition) = keyword_arg(rest, "if") {
        return Some(Directive::If {
            condition,
            negate: false,
            defined_test: false,
        });
    }
    if let Some(condition) = keyword_arg(rest, "elif") {
        return Some(Directive::Elif(condition));
    }
    if keyword_arg(rest, "else").is_some() {
        return Some(Directive::Else);
    }
    if keyword_arg(rest, "endif").is_some() {
        return Some(Directive::Endif);
    }
    None
}

/// Evaluate a single-term condition against the known defines. Returns
/// `None` when the condition is too complex or mentions no known define,
/// in which case the conditional is left untracked.
fn eval_condition(
    condition: &str,
    mut negate: bool,
    defined_test: bool,
    defines: &[(String, String)],
) -> Option<bool> {
    let condition = condition
        .split("//")
        .next()
        .unwrap_or("")
        .split("/*")
        .next()
        .unwrap_or("")
        .trim();

    let term = match condition.strip_prefix('!') {
        Some(rest) => {
            negate = !negate;
            rest.trim()
        }
        None => condition,
    };

    let is_defined_test = defined_test || term.starts_with("defined");
    let name = term
        .strip_prefix("defined")
        .map(|inner| {
            inner
                .trim()
                .trim_start_matches('(')
                .trim_end_matches(')')
                .trim()
        })
        .unwrap_or(term);

    if !is_identifier(name) {
        return None;
    }

    let (_, value) = defines.iter().find(|(key, _)| key == name)?;
    let truthy = if is_defined_test {
        true
    } else {
        value.trim() != "0" && !value.trim().is_empty()
    };

    Some(truthy != negate)
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !text.starts_with(|c: char| c.is_ascii_digit())
}


#[cfg(test)]
#[path = "provider/provider_parameterized_tests.rs"]
mod provider_parameterized_tests;
