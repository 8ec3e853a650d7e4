//! Unit tests for tree walker
//!
//! Tests for `TreeWalker` functionality.

use mcb_ast_utils::visitor::KindCounter;
use mcb_ast_utils::walker::TreeWalker;

use super::common::parse_python;

#[test]
fn test_depth() {
    let tree = parse_python("def main():\n    x = 1\n");
    let root = tree.root_node();
    assert_eq!(TreeWalker::depth(root), 0);

    let nodes = TreeWalker::find_by_kind(root, "assignment");
    assert!(!nodes.is_empty());
    assert!(TreeWalker::depth(nodes[0]) > 0);
}

#[test]
fn test_find_by_kind() {
    let tree = parse_python("def foo():\n    pass\ndef bar():\n    pass\n");
    let functions = TreeWalker::find_by_kind(tree.root_node(), "function_definition");
    assert_eq!(functions.len(), 2);
}

#[test]
fn test_find_first() {
    let tree = parse_python("def main():\n    x = 1\n    y = 2\n");
    let first_assignment = TreeWalker::find_first(tree.root_node(), "assignment");
    assert!(first_assignment.is_some());
}

#[test]
fn test_walk_with_counter() {
    let code = "def main():\n    x = 1\n";
    let tree = parse_python(code);

    let mut counter = KindCounter::new();
    let mut ctx = ();
    TreeWalker::walk(&tree, code.as_bytes(), &mut counter, &mut ctx);

    assert!(counter.count("function_definition") >= 1);
    assert!(counter.count("assignment") >= 1);
}

#[test]
fn test_is_inside_kind() {
    let tree = parse_python("def main():\n    x = 1\n");
    let assignments = TreeWalker::find_by_kind(tree.root_node(), "assignment");
    assert!(!assignments.is_empty());

    assert!(TreeWalker::is_inside_kind(assignments[0], "function_definition"));
}
