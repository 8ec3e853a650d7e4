//! Unit tests for complexity analysis
//!
//! Tests for `ComplexityAnalyzer` functionality.

use mcb_ast_utils::complexity::{ComplexityAnalyzer, count_parameters};
use mcb_ast_utils::walker::TreeWalker;

use super::common::parse_python;

#[test]
fn test_simple_function_complexity() {
    let code = "def simple():\n    x = 1\n";
    let tree = parse_python(code);
    let metrics = ComplexityAnalyzer::analyze(tree.root_node());

    assert_eq!(metrics.cyclomatic, 1); // base complexity only
    assert_eq!(metrics.loops, 0);
    assert_eq!(metrics.branches, 0);
}

#[test]
fn test_if_complexity() {
    let code = "def test():\n    if True:\n        return 1\n    else:\n        return 2\n";
    let tree = parse_python(code);
    let metrics = ComplexityAnalyzer::analyze(tree.root_node());

    assert!(metrics.cyclomatic >= 2);
    assert!(metrics.branches >= 1);
}

#[test]
fn test_loop_complexity() {
    let code = "def test():\n    for i in range(10):\n        pass\n    while True:\n        pass\n";
    let tree = parse_python(code);
    let metrics = ComplexityAnalyzer::analyze(tree.root_node());

    assert!(metrics.cyclomatic >= 3); // 1 base + 2 loops
    assert_eq!(metrics.loops, 2);
}

#[test]
fn test_nesting_depth() {
    let code = "def test():\n    if True:\n        if True:\n            return 1\n";
    let tree = parse_python(code);
    let metrics = ComplexityAnalyzer::analyze(tree.root_node());

    assert!(metrics.max_nesting >= 2);
}

#[test]
fn test_count_parameters() {
    let code = "def test(a, b, c):\n    pass\n";
    let tree = parse_python(code);

    let functions = TreeWalker::find_by_kind(tree.root_node(), "function_definition");
    assert_eq!(functions.len(), 1);

    let count = count_parameters(functions[0]);
    assert_eq!(count, 3);
}
