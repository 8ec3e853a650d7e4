//! Line-number verification for AI-reported code snippets.
//!
//! For any AI-emitted issue whose `code_snippet` is nonempty, the reviewer
//! locates the snippet in the target file using a tiered strategy; the first
//! tier that produces a match wins. If none match, `line_number` stays
//! absent rather than being guessed.

/// Locate `snippet` within `file_text`, trying each tier in order.
///
/// Tiers: (1) exact first-line match with multi-line verification, (2)
/// whole-snippet fuzzy match over a sliding window with >=60% character
/// overlap, (3) distinctive-substring match, (4) domain pattern probes.
#[must_use]
pub fn locate_snippet_line(file_text: &str, snippet: &str) -> Option<usize> {
    let snippet = snippet.trim();
    if snippet.is_empty() {
        return None;
    }

    exact_first_line_match(file_text, snippet)
        .or_else(|| fuzzy_sliding_window_match(file_text, snippet))
        .or_else(|| distinctive_substring_match(file_text, snippet))
        .or_else(|| domain_pattern_probe(file_text, snippet))
}

fn lines_of(file_text: &str) -> Vec<&str> {
    file_text.lines().collect()
}

/// Tier 1: the snippet's first line matches a file line exactly (after
/// trimming), and if the snippet has further lines, they verify too.
fn exact_first_line_match(file_text: &str, snippet: &str) -> Option<usize> {
    let snippet_lines: Vec<&str> = snippet.lines().collect();
    let first = snippet_lines.first()?.trim();
    if first.is_empty() {
        return None;
    }

    let file_lines = lines_of(file_text);
    for (idx, line) in file_lines.iter().enumerate() {
        if line.trim() != first {
            continue;
        }
        let verified = snippet_lines
            .iter()
            .skip(1)
            .enumerate()
            .all(|(offset, expected)| {
                file_lines
                    .get(idx + 1 + offset)
                    .is_some_and(|actual| actual.trim() == expected.trim())
            });
        if verified {
            return Some(idx + 1);
        }
    }
    None
}

/// Tier 2: slide a window the height of the snippet over the file and score
/// character overlap; accept the best window at >=60%.
fn fuzzy_sliding_window_match(file_text: &str, snippet: &str) -> Option<usize> {
    let file_lines = lines_of(file_text);
    let snippet_lines: Vec<&str> = snippet.lines().collect();
    let window = snippet_lines.len().max(1);
    if file_lines.len() < window {
        return None;
    }

    let snippet_chars: usize = snippet.chars().filter(|c| !c.is_whitespace()).count();
    if snippet_chars == 0 {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for start in 0..=(file_lines.len() - window) {
        let candidate = file_lines[start..start + window].join("\n");
        let overlap = char_overlap_ratio(&candidate, snippet);
        if best.is_none_or(|(_, score)| overlap > score) {
            best = Some((start, overlap));
        }
    }

    best.and_then(|(start, score)| (score >= 0.6).then_some(start + 1))
}

fn char_overlap_ratio(candidate: &str, snippet: &str) -> f64 {
    let candidate_set: std::collections::HashSet<char> =
        candidate.chars().filter(|c| !c.is_whitespace()).collect();
    let snippet_chars: Vec<char> = snippet.chars().filter(|c| !c.is_whitespace()).collect();
    if snippet_chars.is_empty() {
        return 0.0;
    }
    let matched = snippet_chars.iter().filter(|c| candidate_set.contains(c)).count();
    matched as f64 / snippet_chars.len() as f64
}

/// Tier 3: find a short, distinctive (non-trivial) substring of the
/// snippet's first non-empty line somewhere in the file.
fn distinctive_substring_match(file_text: &str, snippet: &str) -> Option<usize> {
    let distinctive = snippet
        .lines()
        .map(str::trim)
        .find(|line| line.len() >= 8)?;
    lines_of(file_text)
        .iter()
        .position(|line| line.contains(distinctive))
        .map(|idx| idx + 1)
}

/// Tier 4: probe for domain-specific constructs the snippet likely names
/// (a function/class definition, an assignment target) even when the
/// surrounding formatting differs.
fn domain_pattern_probe(file_text: &str, snippet: &str) -> Option<usize> {
    let token = snippet
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .find(|word| word.len() >= 4)?;
    lines_of(file_text)
        .iter()
        .position(|line| line.contains(token))
        .map(|idx| idx + 1)
}
