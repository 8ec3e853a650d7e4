//! Complexity analysis
//!
//! Calculates cyclomatic and nesting complexity directly from a Python
//! tree-sitter AST, without going through a generic per-function CFG.

use tree_sitter::Node;

use crate::cursor::CursorUtils;
use crate::walker::TreeWalker;

/// Complexity metrics for a code unit.
#[derive(Debug, Clone, Default)]
pub struct ComplexityMetrics {
    /// Cyclomatic complexity (decision points + 1).
    pub cyclomatic: usize,
    /// Maximum nesting depth.
    pub max_nesting: usize,
    /// Number of branches (if/elif/else/boolean operators).
    pub branches: usize,
    /// Number of loops.
    pub loops: usize,
}

/// Complexity analyzer using a Python tree-sitter AST.
pub struct ComplexityAnalyzer;

impl ComplexityAnalyzer {
    /// Analyze the complexity of a node (typically a `function_definition` body).
    pub fn analyze(node: Node<'_>) -> ComplexityMetrics {
        let mut metrics = ComplexityMetrics {
            cyclomatic: 1, // base complexity
            max_nesting: 0,
            branches: 0,
            loops: 0,
        };

        Self::analyze_recursive(node, 0, &mut metrics);
        metrics
    }

    fn analyze_recursive(node: Node<'_>, current_depth: usize, metrics: &mut ComplexityMetrics) {
        if Self::is_nesting_node(node.kind()) {
            let new_depth = current_depth + 1;
            if new_depth > metrics.max_nesting {
                metrics.max_nesting = new_depth;
            }
        }

        if Self::is_decision_point(node.kind()) {
            metrics.cyclomatic += 1;
            metrics.branches += 1;
        }

        if Self::is_loop(node.kind()) {
            metrics.cyclomatic += 1;
            metrics.loops += 1;
        }

        let depth_for_children = if Self::is_nesting_node(node.kind()) {
            current_depth + 1
        } else {
            current_depth
        };

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                Self::analyze_recursive(cursor.node(), depth_for_children, metrics);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }

    fn is_decision_point(kind: &str) -> bool {
        matches!(
            kind,
            "if_statement"
                | "elif_clause"
                | "else_clause"
                | "and_operator"
                | "or_operator"
                | "conditional_expression"
        )
    }

    fn is_loop(kind: &str) -> bool {
        matches!(kind, "for_statement" | "while_statement")
    }

    fn is_nesting_node(kind: &str) -> bool {
        Self::is_decision_point(kind)
            || Self::is_loop(kind)
            || matches!(kind, "block" | "compound_statement" | "suite")
    }

    /// Calculate cognitive complexity (nesting-weighted variant of cyclomatic).
    pub fn cognitive_complexity(node: Node<'_>) -> usize {
        let mut total = 0;
        Self::cognitive_recursive(node, 0, &mut total);
        total
    }

    fn cognitive_recursive(node: Node<'_>, nesting_level: usize, total: &mut usize) {
        if Self::is_decision_point(node.kind()) || Self::is_loop(node.kind()) {
            *total += 1 + nesting_level;
        }

        let new_nesting = if Self::is_nesting_node(node.kind()) {
            nesting_level + 1
        } else {
            nesting_level
        };

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                Self::cognitive_recursive(cursor.node(), new_nesting, total);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
    }
}

/// Nesting depth of `node` measured in enclosing `block`/`suite` ancestors.
pub fn nesting_depth_at(node: Node<'_>) -> usize {
    TreeWalker::ancestors(node)
        .iter()
        .filter(|n| matches!(n.kind(), "block" | "compound_statement" | "suite"))
        .count()
}

/// Count parameters in a `function_definition` node.
pub fn count_parameters(function_node: Node<'_>) -> usize {
    for field in &["parameters", "formal_parameters", "parameter_list"] {
        if let Some(params) = CursorUtils::child_by_field(function_node, field) {
            return CursorUtils::named_children(params)
                .iter()
                .filter(|n| !matches!(n.kind(), "comment" | ","))
                .count();
        }
    }
    0
}

// Tests moved to tests/unit/complexity_tests.rs
