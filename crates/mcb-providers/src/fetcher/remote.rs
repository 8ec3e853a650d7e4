//! Remote-reference fetch: walks a repository tree through a
//! [`RemoteRepoClient`] and materializes the admitted files as
//! [`WorkingFile`]s.

use mcb_domain::constants::{ALLOWED_EXTENSIONS, DEFAULT_PER_FILE_BYTE_CAP, DEFAULT_PER_FILE_LINE_CAP, SKIP_DIRECTORIES};
use mcb_domain::entities::{FileOrigin, WorkingFile};
use mcb_domain::error::Result;
use mcb_domain::ports::RemoteRepoClient;

/// Conventional source-directory names ranked ahead of everything else
/// during traversal.
const CONVENTIONAL_SOURCE_DIRS: &[&str] = &["src", "lib", "app", "backend", "frontend", "source", "api"];

/// Walk `owner/repo` through `client` and return the admitted working set,
/// in deterministic traversal order, capped at `max_files`.
///
/// # Errors
/// Propagates [`mcb_domain::error::Error::RemoteFetch`] from the underlying
/// client; a single file's fetch failure is non-fatal and simply excludes
/// that file from the result.
pub async fn fetch_remote_working_set(
    client: &dyn RemoteRepoClient,
    owner: &str,
    repo: &str,
    max_files: usize,
) -> Result<Vec<WorkingFile>> {
    let entries = client.list_tree(owner, repo).await?;

    let mut candidates: Vec<&str> = entries
        .iter()
        .filter(|e| !e.is_dir)
        .map(|e| e.path.as_str())
        .filter(|path| !is_in_skipped_directory(path))
        .filter(|path| is_allowed(path))
        .collect();

    candidates.sort_by(|a, b| traversal_key(a).cmp(&traversal_key(b)));

    let mut working_set = Vec::with_capacity(max_files.min(candidates.len()));
    for path in candidates {
        if working_set.len() >= max_files {
            break;
        }
        let bytes = match client.fetch_file(owner, repo, path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(path, error = %err, "skipping file that failed to fetch");
                continue;
            }
        };
        if bytes.len() > DEFAULT_PER_FILE_BYTE_CAP {
            tracing::warn!(path, size = bytes.len(), "skipping file over the byte cap");
            continue;
        }
        let bytes = enforce_line_cap(bytes);
        working_set.push(WorkingFile::new(path, bytes, FileOrigin::Remote));
    }

    Ok(working_set)
}

fn is_in_skipped_directory(path: &str) -> bool {
    path.split('/').any(|segment| SKIP_DIRECTORIES.contains(&segment))
}

fn is_allowed(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    let basename = lower.rsplit('/').next().unwrap_or(&lower);
    if basename == "dockerfile" || basename.starts_with("dockerfile.") {
        return true;
    }
    basename
        .rsplit('.')
        .next()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}

/// Traversal-order sort key: conventional source directories first, then
/// source files ahead of config/docs, then alphabetical.
fn traversal_key(path: &str) -> (usize, usize, &str) {
    let top_level_rank = path
        .split('/')
        .next()
        .and_then(|first| CONVENTIONAL_SOURCE_DIRS.iter().position(|dir| *dir == first))
        .unwrap_or(CONVENTIONAL_SOURCE_DIRS.len());

    let lower = path.to_ascii_lowercase();
    let basename = lower.rsplit('/').next().unwrap_or(&lower);
    let extension = basename.rsplit('.').next().unwrap_or("");
    let is_source_file = matches!(extension, "py" | "js" | "jsx" | "ts" | "tsx") || basename == "dockerfile";
    let kind_rank = usize::from(!is_source_file);

    (top_level_rank, kind_rank, path)
}

fn enforce_line_cap(bytes: Vec<u8>) -> Vec<u8> {
    let text = String::from_utf8_lossy(&bytes);
    let total_lines = text.lines().count();
    if total_lines <= DEFAULT_PER_FILE_LINE_CAP {
        return bytes;
    }

    let mut truncated: String = text.lines().take(DEFAULT_PER_FILE_LINE_CAP).collect::<Vec<_>>().join("\n");
    truncated.push_str(&format!(
        "\n... (truncated, {} lines omitted)\n",
        total_lines - DEFAULT_PER_FILE_LINE_CAP
    ));
    truncated.into_bytes()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mcb_domain::ports::RemoteEntry;

    use super::*;

    struct StubClient {
        tree: Vec<RemoteEntry>,
        files: std::collections::HashMap<String, Vec<u8>>,
        fetch_calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RemoteRepoClient for StubClient {
        async fn list_tree(&self, _owner: &str, _repo: &str) -> Result<Vec<RemoteEntry>> {
            Ok(self.tree.clone())
        }

        async fn fetch_file(&self, _owner: &str, _repo: &str, path: &str) -> Result<Vec<u8>> {
            self.fetch_calls.lock().unwrap().push(path.to_owned());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| mcb_domain::error::Error::remote_fetch(format!("no such file: {path}")))
        }
    }

    fn entry(path: &str, is_dir: bool) -> RemoteEntry {
        RemoteEntry { path: path.to_owned(), is_dir }
    }

    #[tokio::test]
    async fn skips_ignored_directories_and_disallowed_extensions() {
        let client = StubClient {
            tree: vec![
                entry("node_modules", true),
                entry("node_modules/pkg.js", false),
                entry("src", true),
                entry("src/main.py", false),
                entry("README.bin", false),
            ],
            files: [("src/main.py".to_owned(), b"x = 1\n".to_vec())].into_iter().collect(),
            fetch_calls: Mutex::new(Vec::new()),
        };

        let set = fetch_remote_working_set(&client, "o", "r", 10).await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].path, "src/main.py");
    }

    #[tokio::test]
    async fn prioritizes_conventional_source_directories() {
        let client = StubClient {
            tree: vec![entry("docs/guide.md", false), entry("src/main.py", false)],
            files: [
                ("docs/guide.md".to_owned(), b"# guide\n".to_vec()),
                ("src/main.py".to_owned(), b"x = 1\n".to_vec()),
            ]
            .into_iter()
            .collect(),
            fetch_calls: Mutex::new(Vec::new()),
        };

        let set = fetch_remote_working_set(&client, "o", "r", 10).await.unwrap();
        assert_eq!(set[0].path, "src/main.py");
    }

    #[tokio::test]
    async fn stops_at_the_max_files_cap() {
        let tree: Vec<RemoteEntry> = (0..5).map(|i| entry(&format!("f{i}.py"), false)).collect();
        let files = (0..5).map(|i| (format!("f{i}.py"), b"x\n".to_vec())).collect();
        let client = StubClient { tree, files, fetch_calls: Mutex::new(Vec::new()) };

        let set = fetch_remote_working_set(&client, "o", "r", 2).await.unwrap();
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn replaces_oversized_files_with_a_truncation_marker() {
        let big = "x = 1\n".repeat(DEFAULT_PER_FILE_LINE_CAP + 10);
        let client = StubClient {
            tree: vec![entry("big.py", false)],
            files: [("big.py".to_owned(), big.into_bytes())].into_iter().collect(),
            fetch_calls: Mutex::new(Vec::new()),
        };

        let set = fetch_remote_working_set(&client, "o", "r", 10).await.unwrap();
        let text = set[0].text();
        assert!(text.contains("truncated"));
        assert!(text.lines().count() <= DEFAULT_PER_FILE_LINE_CAP + 2);
    }
}
