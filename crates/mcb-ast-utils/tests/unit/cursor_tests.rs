//! Unit tests for cursor utilities
//!
//! Tests for `CursorUtils` functionality.

use mcb_ast_utils::cursor::CursorUtils;
use mcb_ast_utils::walker::TreeWalker;

use super::common::parse_python;

#[test]
fn test_siblings() {
    let tree = parse_python("def foo():\n    pass\ndef bar():\n    pass\n");
    let root = tree.root_node();

    let functions: Vec<_> = CursorUtils::children_of_kind(root, "function_definition");
    assert_eq!(functions.len(), 2);

    let siblings = CursorUtils::siblings(functions[0]);
    assert_eq!(siblings.len(), 1);
    assert_eq!(siblings[0].kind(), "function_definition");
}

#[test]
fn test_count_children_of_kind() {
    let tree = parse_python("def main():\n    x = 1\n    y = 2\n");
    let root = tree.root_node();

    let functions: Vec<_> = CursorUtils::children_of_kind(root, "function_definition");
    assert_eq!(functions.len(), 1);

    let block = CursorUtils::first_child_of_kind(functions[0], "block");
    assert!(block.is_some());

    let assignment_count = CursorUtils::count_children_of_kind(block.unwrap(), "expression_statement");
    assert_eq!(assignment_count, 2);
}

#[test]
fn test_path_to_root() {
    let tree = parse_python("def main():\n    x = 1\n");
    let root = tree.root_node();

    let assignments: Vec<_> = TreeWalker::find_by_kind(root, "assignment");
    assert!(!assignments.is_empty());

    let path = CursorUtils::path_to_root(assignments[0]);
    assert!(!path.is_empty());
    assert_eq!(path[0].0, "module");
}

#[test]
fn test_named_children() {
    let tree = parse_python("def foo(x, y):\n    pass\n");
    let root = tree.root_node();

    let functions: Vec<_> = CursorUtils::children_of_kind(root, "function_definition");
    let named = CursorUtils::named_children(functions[0]);

    // Should have name, parameters, and body as named children
    assert!(named.len() >= 2);
}

#[test]
fn test_child_by_field() {
    let tree = parse_python("def foo():\n    pass\n");
    let root = tree.root_node();

    let functions: Vec<_> = CursorUtils::children_of_kind(root, "function_definition");
    let name = CursorUtils::child_by_field(functions[0], "name");

    assert!(name.is_some());
    assert_eq!(name.unwrap().kind(), "identifier");
}
