//! Unit tests for symbol extraction
//!
//! Tests for `SymbolExtractor` functionality.

use mcb_ast_utils::symbols::{SymbolExtractor, SymbolKind};

use super::common::parse_python;

#[test]
fn test_extract_python_functions() {
    let code = "def foo():\n    pass\ndef bar():\n    pass\n";
    let tree = parse_python(code);
    let symbols = SymbolExtractor::extract(&tree, code.as_bytes());

    assert_eq!(symbols.len(), 2);
    assert!(symbols.iter().any(|s| s.name == "foo"));
    assert!(symbols.iter().any(|s| s.name == "bar"));
    assert!(symbols.iter().all(|s| s.kind == SymbolKind::Function));
}

#[test]
fn test_extract_python_class_and_methods() {
    let code = "class Person:\n    def greet(self):\n        pass\n";
    let tree = parse_python(code);
    let symbols = SymbolExtractor::extract(&tree, code.as_bytes());

    assert!(symbols.iter().any(|s| s.name == "Person" && s.kind == SymbolKind::Class));
    assert!(symbols.iter().any(|s| s.name == "greet" && s.kind == SymbolKind::Method));
}

#[test]
fn test_extract_python_symbols() {
    let code = "def greet():\n    pass\n\nclass Person:\n    pass\n";
    let tree = parse_python(code);
    let symbols = SymbolExtractor::extract(&tree, code.as_bytes());

    assert!(symbols.iter().any(|s| s.name == "greet"));
    assert!(symbols.iter().any(|s| s.name == "Person"));
}

#[test]
fn test_symbol_kind_display() {
    assert_eq!(SymbolKind::Function.to_string(), "function");
    assert_eq!(SymbolKind::Method.to_string(), "method");
    assert_eq!(SymbolKind::Class.to_string(), "class");
}
