//! File Discovery (C2).
//!
//! Classifies the working set by language and filename rules, applies the
//! max-files cap by round-robin truncation, and produces an advisory
//! analysis-strategy hint.

use mcb_domain::constants::languages;
use mcb_domain::entities::{DiscoveredSet, WorkingFile};
use mcb_domain::ports::LlmClient;

/// Classify a single path into a language tag, or `None` if unrecognized.
#[must_use]
pub fn classify_language(path: &str) -> Option<&'static str> {
    let lower = path.to_ascii_lowercase();
    let basename = lower.rsplit('/').next().unwrap_or(&lower);

    if basename == "dockerfile" || basename.starts_with("dockerfile.") {
        return Some(languages::DOCKER);
    }

    let extension = basename.rsplit('.').next().unwrap_or("");
    match extension {
        "py" => Some(languages::PYTHON_LIKE),
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => Some(languages::JS_LIKE),
        _ => None,
    }
}

/// Classify every file in `files` into a [`DiscoveredSet`] and enforce
/// `max_files` by round-robin truncation across non-empty languages.
#[must_use]
pub fn discover(files: &[WorkingFile], max_files: usize) -> DiscoveredSet {
    let mut set = DiscoveredSet::new();
    for file in files {
        if let Some(language) = classify_language(&file.path) {
            set.insert(language, file.path.clone());
        }
    }
    set.enforce_cap(max_files);
    set
}

/// Advisory hint produced by discovery: whether the
/// language-stage fan-out is worth parallelizing, which language should be
/// analyzed first, and a coarse complexity estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisStrategyHint {
    /// Whether at least two language groups are non-empty.
    pub parallel_feasible: bool,
    /// Which language tag should be analyzed first.
    pub priority_language: Option<&'static str>,
    /// A coarse, human-readable complexity estimate.
    pub estimated_complexity: &'static str,
}

/// The deterministic fallback heuristic: parallel if >=2 non-empty language
/// groups; Python-like first when present and it has the most files, else
/// whichever non-empty language has the most files.
#[must_use]
pub fn deterministic_strategy_hint(discovered: &DiscoveredSet) -> AnalysisStrategyHint {
    let non_empty = discovered.non_empty_languages();
    let parallel_feasible = non_empty.len() >= 2;

    let priority_language = [languages::PYTHON_LIKE, languages::JS_LIKE, languages::DOCKER]
        .into_iter()
        .max_by_key(|lang| discovered.paths_for(lang).len())
        .filter(|lang| !discovered.paths_for(lang).is_empty());

    let total = discovered.total_files();
    let estimated_complexity = if total > 200 {
        "high"
    } else if total > 50 {
        "medium"
    } else {
        "low"
    };

    AnalysisStrategyHint {
        parallel_feasible,
        priority_language,
        estimated_complexity,
    }
}

/// Ask the LLM for a strategy hint; on any failure or malformed JSON, fall
/// back to the deterministic heuristic.
pub async fn llm_strategy_hint(discovered: &DiscoveredSet, llm: &dyn LlmClient) -> AnalysisStrategyHint {
    let prompt = format!(
        "Given a codebase with {} python-like, {} js-like, and {} Dockerfile files, \
         respond with strict JSON {{\"priority_language\":string,\"parallel_feasible\":bool,\
         \"estimated_complexity\":string}}.",
        discovered.paths_for(languages::PYTHON_LIKE).len(),
        discovered.paths_for(languages::JS_LIKE).len(),
        discovered.paths_for(languages::DOCKER).len(),
    );

    let Ok(raw) = llm.complete(&prompt).await else {
        return deterministic_strategy_hint(discovered);
    };

    #[derive(serde::Deserialize)]
    struct Hint {
        priority_language: String,
        parallel_feasible: bool,
        estimated_complexity: String,
    }

    let Ok(parsed) = serde_json::from_str::<Hint>(raw.trim()) else {
        return deterministic_strategy_hint(discovered);
    };

    let priority_language = match parsed.priority_language.as_str() {
        languages::PYTHON_LIKE => Some(languages::PYTHON_LIKE),
        languages::JS_LIKE => Some(languages::JS_LIKE),
        languages::DOCKER => Some(languages::DOCKER),
        _ => return deterministic_strategy_hint(discovered),
    };

    let estimated_complexity = match parsed.estimated_complexity.as_str() {
        "high" => "high",
        "medium" => "medium",
        _ => "low",
    };

    AnalysisStrategyHint {
        parallel_feasible: parsed.parallel_feasible,
        priority_language,
        estimated_complexity,
    }
}

/// Pick the language analysis order. Respects the deterministic hint's
/// priority, then falls through Python-like -> JS-like -> Docker, omitting
/// empty languages.
#[must_use]
pub fn route_language_analysis(discovered: &DiscoveredSet) -> Vec<&'static str> {
    let hint = deterministic_strategy_hint(discovered);
    let mut order = Vec::new();

    if let Some(priority) = hint.priority_language {
        order.push(priority);
    }
    for lang in [languages::PYTHON_LIKE, languages::JS_LIKE, languages::DOCKER] {
        if !order.contains(&lang) && !discovered.paths_for(lang).is_empty() {
            order.push(lang);
        }
    }
    order
}
