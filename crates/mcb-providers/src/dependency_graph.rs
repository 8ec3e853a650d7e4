//! Import-based dependency graph builder: per-language import extraction
//! with basename/suffix target resolution, using a `tree-sitter` parse for
//! Python.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::Parser;

use mcb_ast_utils::{CursorUtils, TreeWalker};
use mcb_domain::constants::languages;
use mcb_domain::entities::{DependencyGraph, GraphLink, GraphNode, WorkingFile};
use mcb_domain::ports::DependencyGraphBuilder;

static JS_IMPORT_FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\s+.*\s+from\s+['"](.+?)['"]"#).unwrap());
static JS_REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"require\(\s*['"](.+?)['"]\s*\)"#).unwrap());
static FROM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^FROM\s+(\S+)(?:\s+AS\s+(\S+))?").unwrap());
static COPY_FROM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^COPY\s+--from=(\S+)\s+").unwrap());

/// [`DependencyGraphBuilder`] that extracts import/FROM edges per language
/// and resolves them against the working set by suffix/basename match.
#[derive(Debug, Default)]
pub struct ImportDependencyGraphBuilder;

impl DependencyGraphBuilder for ImportDependencyGraphBuilder {
    fn build(&self, files: &[WorkingFile]) -> DependencyGraph {
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();

        let mut raw_imports: HashMap<&str, Vec<String>> = HashMap::new();
        let mut docker_bases: HashMap<&str, Vec<String>> = HashMap::new();
        let mut stage_aliases: HashSet<String> = HashSet::new();

        for file in files {
            match language_for(&file.path) {
                Some(languages::PYTHON_LIKE) => {
                    raw_imports.insert(file.path.as_str(), extract_python_imports(&file.text()));
                }
                Some(languages::JS_LIKE) => {
                    raw_imports.insert(file.path.as_str(), extract_js_imports(&file.text()));
                }
                Some(languages::DOCKER) => {
                    let (bases, aliases) = extract_docker_bases(&file.text());
                    stage_aliases.extend(aliases);
                    docker_bases.insert(file.path.as_str(), bases);
                }
                _ => {}
            }
        }

        let docker_bases: HashMap<&str, Vec<String>> = docker_bases
            .into_iter()
            .map(|(path, bases)| (path, bases.into_iter().filter(|b| !stage_aliases.contains(b)).collect()))
            .collect();

        let mut links = Vec::new();
        for (&source, imports) in &raw_imports {
            for import in imports {
                if let Some(target) = resolve_import(import, &paths) {
                    if target != source {
                        links.push(GraphLink { source: source.to_owned(), target: target.to_owned(), value: 1 });
                    }
                }
            }
        }

        let mut base_image_ids: HashSet<String> = HashSet::new();
        for (&source, bases) in &docker_bases {
            for base in bases {
                let target = format!("docker:{base}");
                base_image_ids.insert(target.clone());
                links.push(GraphLink { source: source.to_owned(), target, value: 1 });
            }
        }

        let mut out_degree: HashMap<&str, u32> = HashMap::new();
        for link in &links {
            *out_degree.entry(link.source.as_str()).or_insert(0) += 1;
        }

        let mut nodes: Vec<GraphNode> = files
            .iter()
            .map(|file| {
                let basename = file.path.rsplit('/').next().unwrap_or(&file.path).to_owned();
                let group = language_for(&file.path).unwrap_or("other").to_owned();
                GraphNode {
                    id: file.path.clone(),
                    name: basename,
                    group,
                    node_type: "file".to_owned(),
                    size: 100 + 20 * out_degree.get(file.path.as_str()).copied().unwrap_or(0),
                }
            })
            .collect();

        for id in base_image_ids {
            let name = id.strip_prefix("docker:").unwrap_or(&id).to_owned();
            nodes.push(GraphNode {
                id: id.clone(),
                name,
                group: languages::DOCKER.to_owned(),
                node_type: "docker-base".to_owned(),
                size: 100,
            });
        }

        DependencyGraph { nodes, links }
    }
}

fn language_for(path: &str) -> Option<&'static str> {
    let lower = path.to_ascii_lowercase();
    let basename = lower.rsplit('/').next().unwrap_or(&lower);
    if basename == "dockerfile" || basename.starts_with("dockerfile.") {
        return Some(languages::DOCKER);
    }
    match basename.rsplit('.').next()? {
        "py" => Some(languages::PYTHON_LIKE),
        "js" | "jsx" | "ts" | "tsx" => Some(languages::JS_LIKE),
        _ => None,
    }
}

fn extract_python_imports(source: &str) -> Vec<String> {
    let mut parser = Parser::new();
    if parser.set_language(&tree_sitter_python::LANGUAGE.into()).is_err() {
        return Vec::new();
    }
    let Some(tree) = parser.parse(source, None) else { return Vec::new() };
    let bytes = source.as_bytes();
    let root = tree.root_node();

    let mut imports = Vec::new();

    for node in TreeWalker::find_by_kind(root, "import_statement") {
        for child in CursorUtils::named_children(node) {
            match child.kind() {
                "dotted_name" => {
                    if let Ok(text) = child.utf8_text(bytes) {
                        imports.push(text.to_owned());
                    }
                }
                "aliased_import" => {
                    if let Some(name) = CursorUtils::child_by_field(child, "name") {
                        if let Ok(text) = name.utf8_text(bytes) {
                            imports.push(text.to_owned());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    for node in TreeWalker::find_by_kind(root, "import_from_statement") {
        if let Some(module) = CursorUtils::child_by_field(node, "module_name") {
            if let Ok(text) = module.utf8_text(bytes) {
                imports.push(text.to_owned());
            }
        }
    }

    imports
}

fn extract_js_imports(source: &str) -> Vec<String> {
    let mut imports = Vec::new();
    for captures in JS_IMPORT_FROM_RE.captures_iter(source) {
        imports.push(captures[1].to_owned());
    }
    for captures in JS_REQUIRE_RE.captures_iter(source) {
        imports.push(captures[1].to_owned());
    }
    imports
}

/// Returns `(base_images, stage_aliases)` for a Dockerfile's text.
fn extract_docker_bases(source: &str) -> (Vec<String>, Vec<String>) {
    let mut bases = Vec::new();
    let mut aliases = Vec::new();

    for line in source.lines() {
        let line = line.trim();
        if let Some(captures) = FROM_RE.captures(line) {
            bases.push(captures[1].to_owned());
            if let Some(alias) = captures.get(2) {
                aliases.push(alias.as_str().to_owned());
            }
        }
        if let Some(captures) = COPY_FROM_RE.captures(line) {
            bases.push(captures[1].to_owned());
        }
    }

    (bases, aliases)
}

/// Extensions a bare module reference may resolve against: `/target`,
/// `/target.{py|js|jsx|ts|tsx}`, or basename equality.
const RESOLVABLE_EXTENSIONS: &[&str] = &["py", "js", "jsx", "ts", "tsx"];

/// Resolve a raw import string against the working set's file paths, using
/// the same basename/suffix heuristics as the original service.
fn resolve_import<'a>(import: &str, paths: &[&'a str]) -> Option<&'a str> {
    let dotted_as_path = import.replace('.', "/");
    let import_basename = import.rsplit(['/', '\\']).next().unwrap_or(import);

    paths.iter().copied().find(|candidate| {
        if *candidate == import
            || candidate.ends_with(&format!("/{import}"))
            || candidate.rsplit('/').next() == Some(import_basename)
        {
            return true;
        }
        RESOLVABLE_EXTENSIONS.iter().any(|ext| {
            candidate.ends_with(&format!("/{import}.{ext}"))
                || candidate.ends_with(&format!("/{dotted_as_path}.{ext}"))
                || candidate.rsplit('/').next() == Some(&format!("{import_basename}.{ext}"))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_domain::entities::FileOrigin;

    fn file(path: &str, text: &str) -> WorkingFile {
        WorkingFile::new(path, text.as_bytes().to_vec(), FileOrigin::Uploaded)
    }

    #[test]
    fn links_a_python_import_to_a_sibling_module() {
        let files = vec![
            file("src/app.py", "from src.utils import helper\n"),
            file("src/utils.py", "def helper():\n    pass\n"),
        ];
        let graph = ImportDependencyGraphBuilder.build(&files);
        assert!(graph.links_reference_known_nodes());
        assert!(graph.links.iter().any(|l| l.source == "src/app.py" && l.target == "src/utils.py"));
    }

    #[test]
    fn links_a_js_require_to_a_sibling_module() {
        let files = vec![
            file("src/index.js", "const util = require('./util');\n"),
            file("src/util.js", "module.exports = {};\n"),
        ];
        let graph = ImportDependencyGraphBuilder.build(&files);
        assert!(graph.links.iter().any(|l| l.source == "src/index.js" && l.target == "src/util.js"));
    }

    #[test]
    fn creates_a_docker_base_node_for_an_unresolved_from() {
        let files = vec![file("Dockerfile", "FROM python:3.12\nUSER app\nCMD [\"true\"]\n")];
        let graph = ImportDependencyGraphBuilder.build(&files);
        assert!(graph.nodes.iter().any(|n| n.node_type == "docker-base" && n.name == "python:3.12"));
        assert!(graph.links.iter().any(|l| l.source == "Dockerfile" && l.target == "docker:python:3.12"));
    }

    #[test]
    fn does_not_link_a_multi_stage_alias_reference() {
        let dockerfile = "FROM golang:1.22 AS builder\nFROM python:3.12\nCOPY --from=builder /bin/app /bin/app\nUSER app\nCMD [\"true\"]\n";
        let files = vec![file("Dockerfile", dockerfile)];
        let graph = ImportDependencyGraphBuilder.build(&files);
        assert!(!graph.nodes.iter().any(|n| n.name == "builder"));
    }

    #[test]
    fn every_link_references_a_known_node() {
        let files = vec![
            file("a.py", "import os\nimport b\n"),
            file("b.py", "x = 1\n"),
        ];
        let graph = ImportDependencyGraphBuilder.build(&files);
        assert!(graph.links_reference_known_nodes());
    }
}
