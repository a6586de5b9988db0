//! Parsing with tree-sitter-kotlin and lowering into a [`Script`].
//!
//! The grammar accepts the whole Kotlin language, so the lowering keeps what
//! build scripts declare (assignments, calls, blocks, infix plugin modifiers,
//! reference chains) and carries everything else as source text: statements
//! become [`StatementKind::Other`] and expressions [`Expr::Opaque`]. Only
//! syntax errors reported by the grammar fail parsing.

use super::ast::{Argument, Call, Expr, Script, Statement, StatementKind};
use crate::error::{DescriptorError, Result};
use tree_sitter::{Node, Parser};

/// Infix words accepted after a call statement, as in `id("x") version "1.0" apply false`
const INFIX_WORDS: &[&str] = &["version", "apply"];

/// Longest source excerpt quoted in labels and error messages
const EXCERPT_CHARS: usize = 60;

/// Parse a build script
pub fn parse(source: &str) -> Result<Script> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_kotlin::language())
        .map_err(|e| DescriptorError::parse(1, 1, format!("Kotlin grammar cannot be loaded: {}", e)))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| DescriptorError::parse(1, 1, "parser produced no syntax tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(syntax_error(source, root));
    }

    let lower = Lower { source };
    Ok(Script {
        statements: lower.statements(root),
    })
}

fn syntax_error(source: &str, root: Node<'_>) -> DescriptorError {
    let node = first_error(root).unwrap_or(root);
    let (line, column) = position(source, node);
    let message = if node.is_missing() {
        format!("missing '{}'", node.kind())
    } else {
        match excerpt(slice(source, node)) {
            Some(text) => format!("unexpected '{}'", text),
            None => "unexpected end of input".to_string(),
        }
    };
    DescriptorError::parse(line, column, message)
}

/// First `ERROR` or `MISSING` node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// 1-based line and character column of a node's first byte
fn position(source: &str, node: Node<'_>) -> (usize, usize) {
    let before = source.get(..node.start_byte()).unwrap_or("");
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (
        node.start_position().row + 1,
        before[line_start..].chars().count() + 1,
    )
}

fn slice<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// First non-blank line, shortened
fn excerpt(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(line.chars().take(EXCERPT_CHARS).collect())
}

fn is_comment(node: &Node<'_>) -> bool {
    node.kind().ends_with("comment")
}

/// Named children without comments
fn named(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_comment(c))
        .collect()
}

/// All children, anonymous tokens included, without comments
fn tokens(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).filter(|c| !is_comment(c)).collect()
}

/// The child following a direct `=` token
fn after_equals(node: Node<'_>) -> Option<Node<'_>> {
    let children = tokens(node);
    let idx = children.iter().position(|c| c.kind() == "=")?;
    children.get(idx + 1).copied()
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    named(node).into_iter().find(|c| c.kind() == kind)
}

struct Lower<'a> {
    source: &'a str,
}

impl<'a> Lower<'a> {
    fn text(&self, node: Node<'_>) -> &'a str {
        slice(self.source, node)
    }

    fn label(&self, node: Node<'_>) -> String {
        excerpt(self.text(node)).unwrap_or_else(|| node.kind().to_string())
    }

    fn statements(&self, container: Node<'_>) -> Vec<Statement> {
        let mut out = Vec::new();
        for child in named(container) {
            match child.kind() {
                "statements" | "import_list" => out.extend(self.statements(child)),
                "shebang_line" | "file_annotation" | "package_header" => {}
                _ => out.push(self.statement(child)),
            }
        }
        out
    }

    fn statement(&self, node: Node<'_>) -> Statement {
        let (line, column) = position(self.source, node);
        let kind = match node.kind() {
            "import_header" => self.import(node),
            "property_declaration" => self.property(node),
            "assignment" => self.assignment(node),
            _ => match self.call_statement(node) {
                Some(call) => StatementKind::Call(call),
                None => StatementKind::Other(self.label(node)),
            },
        };
        Statement { kind, line, column }
    }

    fn import(&self, node: Node<'_>) -> StatementKind {
        match child_of_kind(node, "identifier").and_then(|id| dotted(self.text(id))) {
            Some(path) => StatementKind::Import(path),
            None => StatementKind::Other(self.label(node)),
        }
    }

    fn property(&self, node: Node<'_>) -> StatementKind {
        let name = child_of_kind(node, "variable_declaration")
            .and_then(|decl| child_of_kind(decl, "simple_identifier"))
            .and_then(|id| identifier(self.text(id)));
        let Some(name) = name else {
            return StatementKind::Other(self.label(node));
        };
        // `by lazy { }` delegates and uninitialised declarations
        let value = match after_equals(node) {
            Some(value) => self.expr(value),
            None => Expr::Opaque(self.text(node).to_string()),
        };
        StatementKind::Val { name, value }
    }

    fn assignment(&self, node: Node<'_>) -> StatementKind {
        let target = named(node)
            .first()
            .and_then(|target| dotted(self.text(*target)));
        match (target, after_equals(node)) {
            (Some(target), Some(value)) => StatementKind::Assign {
                target,
                value: self.expr(value),
            },
            // `+=` and assignments to indexed or computed targets
            _ => StatementKind::Other(self.label(node)),
        }
    }

    fn call_statement(&self, node: Node<'_>) -> Option<Call> {
        match node.kind() {
            "infix_expression" => {
                let children = named(node);
                let &[left, word, right] = children.as_slice() else {
                    return None;
                };
                let word = self.text(word);
                if !INFIX_WORDS.contains(&word) {
                    return None;
                }
                let mut call = self.call_statement(left)?;
                call.infix.push((word.to_string(), self.expr(right)));
                Some(call)
            }
            "call_expression" => {
                let children = named(node);
                let &[callee, suffix] = children.as_slice() else {
                    return None;
                };
                let target = dotted(self.text(callee))?;
                let (args, block) = self.call_suffix(suffix);
                Some(Call {
                    target,
                    args,
                    block,
                    infix: Vec::new(),
                })
            }
            // Bare references such as `` `java-library` ``
            "simple_identifier" | "navigation_expression" => Some(Call {
                target: dotted(self.text(node))?,
                args: None,
                block: None,
                infix: Vec::new(),
            }),
            _ => None,
        }
    }

    fn call_suffix(&self, suffix: Node<'_>) -> (Option<Vec<Argument>>, Option<Vec<Statement>>) {
        let mut args = None;
        let mut block = None;
        for child in named(suffix) {
            match child.kind() {
                "value_arguments" => {
                    args = Some(
                        named(child)
                            .into_iter()
                            .filter(|arg| arg.kind() == "value_argument")
                            .map(|arg| self.argument(arg))
                            .collect(),
                    )
                }
                "annotated_lambda" | "lambda_literal" => block = Some(self.lambda_body(child)),
                _ => {}
            }
        }
        (args, block)
    }

    fn argument(&self, node: Node<'_>) -> Argument {
        let children = tokens(node);
        if let Some(eq) = children.iter().position(|c| c.kind() == "=") {
            let name = children[..eq]
                .iter()
                .rev()
                .find(|c| c.kind() == "simple_identifier")
                .and_then(|id| identifier(self.text(*id)));
            if let Some(value) = children.get(eq + 1) {
                return Argument {
                    name,
                    value: self.expr(*value),
                };
            }
        }
        match named(node).last() {
            Some(value) => Argument::positional(self.expr(*value)),
            None => Argument::positional(Expr::Opaque(self.text(node).to_string())),
        }
    }

    fn lambda_body(&self, node: Node<'_>) -> Vec<Statement> {
        let lambda = if node.kind() == "lambda_literal" {
            Some(node)
        } else {
            child_of_kind(node, "lambda_literal")
        };
        lambda
            .and_then(|l| child_of_kind(l, "statements"))
            .map(|body| self.statements(body))
            .unwrap_or_default()
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let opaque = || Expr::Opaque(self.text(node).to_string());
        match node.kind() {
            "string_literal" | "line_string_literal" | "multi_line_string_literal" => {
                unquote(self.text(node)).map_or_else(opaque, Expr::Str)
            }
            "integer_literal" | "long_literal" | "hex_literal" | "bin_literal" => {
                integer(self.text(node)).map_or_else(opaque, Expr::Int)
            }
            "boolean_literal" => Expr::Bool(self.text(node) == "true"),
            "null" | "null_literal" => Expr::Path(vec!["null".to_string()]),
            "simple_identifier" => match identifier(self.text(node)) {
                Some(name) => Expr::Path(vec![name]),
                None => opaque(),
            },
            "parenthesized_expression" => match named(node).first() {
                Some(inner) => self.expr(*inner),
                None => opaque(),
            },
            "navigation_expression" => self.navigation(node).unwrap_or_else(opaque),
            "call_expression" => self.call_expr(node).unwrap_or_else(opaque),
            "indexing_expression" => {
                let children = named(node);
                let key = children
                    .last()
                    .filter(|s| s.kind() == "indexing_suffix")
                    .and_then(|s| named(*s).into_iter().next());
                match (children.first(), key) {
                    (Some(receiver), Some(key)) => Expr::Index {
                        receiver: Box::new(self.expr(*receiver)),
                        key: Box::new(self.expr(key)),
                    },
                    _ => opaque(),
                }
            }
            "as_expression" => {
                let children = named(node);
                match children.as_slice() {
                    &[value, ty] => Expr::Cast {
                        value: Box::new(self.expr(value)),
                        ty: self.text(ty).to_string(),
                    },
                    _ => opaque(),
                }
            }
            _ => opaque(),
        }
    }

    /// `a.b.c` as a path, `call().name` as a member; `?.` and `::` stay opaque
    fn navigation(&self, node: Node<'_>) -> Option<Expr> {
        let children = named(node);
        let &[receiver, suffix] = children.as_slice() else {
            return None;
        };
        if !self.text(suffix).trim_start().starts_with('.') {
            return None;
        }
        let name = child_of_kind(suffix, "simple_identifier").and_then(|id| identifier(self.text(id)))?;
        match self.expr(receiver) {
            Expr::Path(mut parts) => {
                parts.push(name);
                Some(Expr::Path(parts))
            }
            Expr::Opaque(_) => None,
            other => Some(Expr::Member {
                receiver: Box::new(other),
                name,
            }),
        }
    }

    fn call_expr(&self, node: Node<'_>) -> Option<Expr> {
        let children = named(node);
        let &[callee, suffix] = children.as_slice() else {
            return None;
        };
        let (args, block) = self.call_suffix(suffix);
        // A trailing lambda in value position (`?.let { }`, `lazy { }`)
        if block.is_some() {
            return None;
        }
        let args: Vec<Expr> = args.unwrap_or_default().into_iter().map(|a| a.value).collect();
        match self.expr(callee) {
            Expr::Path(callee) => Some(Expr::Call {
                receiver: None,
                callee,
                args,
            }),
            Expr::Member { receiver, name } => Some(Expr::Call {
                receiver: Some(receiver),
                callee: vec![name],
                args,
            }),
            _ => None,
        }
    }
}

/// An identifier, with backticks removed
fn identifier(text: &str) -> Option<String> {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        return (!inner.is_empty()).then(|| inner.to_string());
    }
    let mut chars = text.chars();
    let first = chars.next()?;
    let valid = (first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_');
    valid.then(|| text.to_string())
}

/// `a.b.c` split into identifiers; `None` for anything but a plain chain
fn dotted(text: &str) -> Option<Vec<String>> {
    text.split('.').map(identifier).collect()
}

fn starts_template(next: Option<&char>) -> bool {
    next.is_some_and(|&c| c == '{' || c == '_' || c.is_alphabetic())
}

/// Decode a string literal. Templates and unknown escapes yield `None`.
fn unquote(raw: &str) -> Option<String> {
    if let Some(body) = raw.strip_prefix("\"\"\"").and_then(|r| r.strip_suffix("\"\"\"")) {
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '$' && starts_template(chars.peek()) {
                return None;
            }
        }
        return Some(body.to_string());
    }

    let body = raw.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let decoded = match chars.next()? {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'b' => '\u{8}',
                    'u' => {
                        let hex: String = chars.by_ref().take(4).collect();
                        char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
                    }
                    c @ ('"' | '\'' | '\\' | '$') => c,
                    _ => return None,
                };
                out.push(decoded);
            }
            '$' if starts_template(chars.peek()) => return None,
            c => out.push(c),
        }
    }
    Some(out)
}

fn integer(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let digits = digits.trim_end_matches(|c| matches!(c, 'L' | 'l' | 'u' | 'U'));
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).ok()
    } else {
        digits.parse().ok()
    }
}
