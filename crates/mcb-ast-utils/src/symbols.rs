//! Symbol extraction
//!
//! Utilities for extracting function and class names from a parsed Python
//! AST.

use tree_sitter::{Node, Tree};

use crate::cursor::CursorUtils;
use crate::walker::TreeWalker;

/// Information about an extracted symbol.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    /// Symbol name.
    pub name: String,
    /// Symbol kind (function, class, method).
    pub kind: SymbolKind,
    /// Start line (0-indexed).
    pub start_line: usize,
    /// End line (0-indexed).
    pub end_line: usize,
    /// Start column (0-indexed).
    pub start_column: usize,
    /// Parent symbol name (for methods).
    pub parent: Option<String>,
}

/// Kind of symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A function.
    Function,
    /// A method (function defined inside a class).
    Method,
    /// A class.
    Class,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Method => write!(f, "method"),
            SymbolKind::Class => write!(f, "class"),
        }
    }
}

/// Symbol extractor for Python source.
pub struct SymbolExtractor;

impl SymbolExtractor {
    /// Extract all symbols from a tree.
    pub fn extract(tree: &Tree, source: &[u8]) -> Vec<SymbolInfo> {
        let root = tree.root_node();
        let mut symbols = Vec::new();

        Self::extract_symbols_of_kind(root, source, "class_definition", SymbolKind::Class, &mut symbols);
        Self::extract_functions_with_method_check(
            root,
            source,
            "function_definition",
            "class_definition",
            &mut symbols,
        );

        symbols
    }

    /// Extract a function/class name from a node.
    pub fn extract_name(node: Node<'_>, source: &[u8]) -> Option<String> {
        for field in &["name", "identifier"] {
            if let Some(name_node) = CursorUtils::child_by_field(node, field)
                && let Ok(name) = name_node.utf8_text(source)
            {
                return Some(name.to_string());
            }
        }

        CursorUtils::first_child_of_kind(node, "identifier")
            .and_then(|n| n.utf8_text(source).ok())
            .map(String::from)
    }

    fn extract_symbols_of_kind(
        node: Node<'_>,
        source: &[u8],
        node_kind: &str,
        symbol_kind: SymbolKind,
        symbols: &mut Vec<SymbolInfo>,
    ) {
        for item in TreeWalker::find_by_kind(node, node_kind) {
            if let Some(name) = Self::extract_name(item, source) {
                symbols.push(SymbolInfo {
                    name,
                    kind: symbol_kind,
                    start_line: item.start_position().row,
                    end_line: item.end_position().row,
                    start_column: item.start_position().column,
                    parent: None,
                });
            }
        }
    }

    fn extract_functions_with_method_check(
        node: Node<'_>,
        source: &[u8],
        func_kind: &str,
        parent_kind: &str,
        symbols: &mut Vec<SymbolInfo>,
    ) {
        for func in TreeWalker::find_by_kind(node, func_kind) {
            if let Some(name) = Self::extract_name(func, source) {
                let is_method = TreeWalker::is_inside_kind(func, parent_kind);
                symbols.push(SymbolInfo {
                    name,
                    kind: if is_method {
                        SymbolKind::Method
                    } else {
                        SymbolKind::Function
                    },
                    start_line: func.start_position().row,
                    end_line: func.end_position().row,
                    start_column: func.start_position().column,
                    parent: None,
                });
            }
        }
    }
}
