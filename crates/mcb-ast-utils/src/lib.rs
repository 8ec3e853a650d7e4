//! AST traversal and analysis utilities for the Python-like source analyzer.
//! Built on tree-sitter for direct AST access and analysis.
//!
//! ## Features
//!
//! - **Tree Walking**: Depth-first traversal with visitor pattern
//! - **Cursor Utilities**: Navigation helpers for tree-sitter cursors
//! - **Symbol Extraction**: Extract function and class symbols
//! - **Complexity Analysis**: Calculate cyclomatic and cognitive complexity
//!
//! ## Example
//!
//! ```no_run
//! use mcb_ast_utils::{ComplexityAnalyzer, SymbolExtractor};
//! use tree_sitter::Parser;
//!
//! fn example() {
//!     let mut parser = Parser::new();
//!     parser.set_language(&tree_sitter_python::LANGUAGE.into()).unwrap();
//!
//!     let code = "def greet():\n    print('hello')\n";
//!     let tree = parser.parse(code, None).unwrap();
//!
//!     let symbols = SymbolExtractor::extract(&tree, code.as_bytes());
//!     println!("Found {} symbols", symbols.len());
//!
//!     let metrics = ComplexityAnalyzer::analyze(tree.root_node());
//!     println!("Cyclomatic complexity: {}", metrics.cyclomatic);
//! }
//! ```

pub mod complexity;
pub mod cursor;
pub mod error;
pub mod symbols;
pub mod visitor;
pub mod walker;

// Re-export main types
pub use complexity::{ComplexityAnalyzer, ComplexityMetrics, count_parameters, nesting_depth_at};
pub use cursor::CursorUtils;
pub use error::{AstError, Result};
pub use symbols::{SymbolExtractor, SymbolInfo, SymbolKind};
pub use visitor::{KindCollector, KindCounter, NodeMatch, NodeVisitor};
pub use walker::TreeWalker;
