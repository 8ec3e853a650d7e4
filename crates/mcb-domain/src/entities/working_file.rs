//! `WorkingFile` and `DiscoveredSet`.

use std::collections::BTreeMap;

/// Origin of a [`WorkingFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrigin {
    /// Materialized from a client-uploaded bundle.
    Uploaded,
    /// Materialized by walking a remote repository tree.
    Remote,
}

/// A single file materialized into the job's working set.
///
/// Immutable once collected; the fetcher is the only producer.
#[derive(Debug, Clone)]
pub struct WorkingFile {
    /// Path as it appeared in the submission (upload filename, or
    /// repository-relative path for a remote fetch).
    pub path: String,
    /// Raw file contents, already base64-decoded and line-capped.
    pub bytes: Vec<u8>,
    /// Where this file came from.
    pub origin: FileOrigin,
}

impl WorkingFile {
    /// Construct a new working file.
    #[must_use]
    pub fn new(path: impl Into<String>, bytes: Vec<u8>, origin: FileOrigin) -> Self {
        Self {
            path: path.into(),
            bytes,
            origin,
        }
    }

    /// UTF-8 lossy view of the file contents, for analyzers that work on text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// The working set partitioned by language tag.
///
/// Deterministic for a given working set: insertion order within each
/// language bucket follows the fetcher's traversal order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredSet {
    by_language: BTreeMap<String, Vec<String>>,
}

impl DiscoveredSet {
    /// Construct an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` under `language`, preserving the existing order.
    pub fn insert(&mut self, language: impl Into<String>, path: impl Into<String>) {
        self.by_language.entry(language.into()).or_default().push(path.into());
    }

    /// Paths discovered under `language`, in deterministic order.
    #[must_use]
    pub fn paths_for(&self, language: &str) -> &[String] {
        self.by_language.get(language).map_or(&[], Vec::as_slice)
    }

    /// Languages with at least one discovered file, in a stable order.
    #[must_use]
    pub fn non_empty_languages(&self) -> Vec<&str> {
        self.by_language
            .iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(lang, _)| lang.as_str())
            .collect()
    }

    /// Total number of discovered files across all languages.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.by_language.values().map(Vec::len).sum()
    }

    /// Truncate each language bucket round-robin until the total count is at
    /// most `cap`, keeping representation for every non-empty language where
    /// possible.
    pub fn enforce_cap(&mut self, cap: usize) {
        if self.total_files() <= cap {
            return;
        }

        let languages: Vec<String> = self.by_language.keys().cloned().collect();
        let mut kept: BTreeMap<String, Vec<String>> =
            languages.iter().cloned().map(|k| (k, Vec::new())).collect();
        let mut taken = 0usize;
        let mut round = 0usize;

        'outer: loop {
            let mut progressed = false;
            for lang in &languages {
                if taken >= cap {
                    break 'outer;
                }
                if let Some(path) = self.by_language[lang].get(round) {
                    kept.get_mut(lang).unwrap().push(path.clone());
                    taken += 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
            round += 1;
        }

        self.by_language = kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_cap_keeps_every_language_represented() {
        let mut set = DiscoveredSet::new();
        for i in 0..5 {
            set.insert("python-like", format!("a{i}.py"));
        }
        set.insert("js-like", "only.js");

        set.enforce_cap(3);

        assert_eq!(set.total_files(), 3);
        assert!(!set.paths_for("js-like").is_empty());
        assert!(!set.paths_for("python-like").is_empty());
    }

    #[test]
    fn cap_above_total_is_a_no_op() {
        let mut set = DiscoveredSet::new();
        set.insert("python-like", "a.py");
        set.enforce_cap(10);
        assert_eq!(set.total_files(), 1);
    }
}
