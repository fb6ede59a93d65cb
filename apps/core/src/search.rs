use crate::model::{normalize_query, ApplicationEntry};
use crate::usage::UsageHistory;

pub const RESULT_LIMIT: usize = 8;

const EXACT_MATCH_SCORE: u32 = 1000;
const NAME_PREFIX_SCORE: u32 = 100;
const WORD_PREFIX_SCORE: u32 = 50;
const EXECUTABLE_PREFIX_SCORE: u32 = 80;
const NAME_SUBSTRING_SCORE: u32 = 30;
const EXECUTABLE_SUBSTRING_SCORE: u32 = 20;
const FUZZY_CAP: u32 = 10;
const USAGE_PER_LAUNCH: u32 = 30;
const USAGE_CAP: u32 = 500;

pub fn search<'a>(
    catalog: &'a [ApplicationEntry],
    query: &str,
    usage: &UsageHistory,
) -> Vec<&'a ApplicationEntry> {
    search_with_limit(catalog, query, usage, RESULT_LIMIT)
}

pub fn search_with_limit<'a>(
    catalog: &'a [ApplicationEntry],
    query: &str,
    usage: &UsageHistory,
    limit: usize,
) -> Vec<&'a ApplicationEntry> {
    search_scored(catalog, query, usage, limit)
        .into_iter()
        .map(|(entry, _)| entry)
        .collect()
}

/// Ranked matches with their scores. Ties keep catalog order.
pub fn search_scored<'a>(
    catalog: &'a [ApplicationEntry],
    query: &str,
    usage: &UsageHistory,
    limit: usize,
) -> Vec<(&'a ApplicationEntry, u32)> {
    if limit == 0 || catalog.is_empty() {
        return Vec::new();
    }

    let normalized_query = normalize_query(query);
    if normalized_query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, usize, &ApplicationEntry)> = catalog
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let score = score_normalized(&normalized_query, entry, usage);
            (score > 0).then_some((score, index, entry))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    scored
        .into_iter()
        .take(limit)
        .map(|(score, _, entry)| (entry, score))
        .collect()
}

/// Ghost-text continuation of `query` taken from the best match over the
/// whole catalog, when that match's name starts with the query.
pub fn best_completion(
    catalog: &[ApplicationEntry],
    query: &str,
    usage: &UsageHistory,
) -> Option<String> {
    let best = best_match(catalog, query, usage)?;
    strip_prefix_ignore_case(best.display_name(), query).map(str::to_string)
}

pub fn best_match<'a>(
    catalog: &'a [ApplicationEntry],
    query: &str,
    usage: &UsageHistory,
) -> Option<&'a ApplicationEntry> {
    let normalized_query = normalize_query(query);
    if normalized_query.is_empty() {
        return None;
    }

    let mut best: Option<(&ApplicationEntry, u32)> = None;
    for entry in catalog {
        let score = score_normalized(&normalized_query, entry, usage);
        if score > best.map_or(0, |(_, top)| top) {
            best = Some((entry, score));
        }
    }
    best.map(|(entry, _)| entry)
}

pub fn score(query: &str, entry: &ApplicationEntry, usage: &UsageHistory) -> u32 {
    score_normalized(&normalize_query(query), entry, usage)
}

fn score_normalized(query: &str, entry: &ApplicationEntry, usage: &UsageHistory) -> u32 {
    if query.is_empty() {
        return 0;
    }

    let name = entry.name_lower();
    let executable = entry.executable_lower();

    if name == query {
        return EXACT_MATCH_SCORE;
    }

    let mut score = 0;

    let name_matched = if name.starts_with(query) {
        score += NAME_PREFIX_SCORE;
        true
    } else if name_words(name).any(|word| word.starts_with(query)) {
        score += WORD_PREFIX_SCORE;
        true
    } else {
        false
    };

    let executable_prefix = executable.starts_with(query);
    if executable_prefix {
        score += EXECUTABLE_PREFIX_SCORE;
    }

    // Substring signals only count when the matching prefix signal did not.
    if !name_matched && name.contains(query) {
        score += NAME_SUBSTRING_SCORE;
    }
    if !executable_prefix && executable.contains(query) {
        score += EXECUTABLE_SUBSTRING_SCORE;
    }

    score += fuzzy_score(query, name).min(FUZZY_CAP);

    if score == 0 {
        return 0;
    }

    if let Some(record) = usage.get(entry.identity()) {
        score += record
            .launch_count
            .saturating_mul(USAGE_PER_LAUNCH)
            .min(USAGE_CAP);
    }

    score
}

/// Subsequence score: each matched character adds twice the length of the
/// current consecutive run. Zero unless every query character is matched.
pub fn fuzzy_score(query: &str, text: &str) -> u32 {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return 0;
    }

    let mut score = 0u32;
    let mut cursor = 0;
    let mut run = 0u32;

    for hay_char in text.chars() {
        if cursor == needle.len() {
            break;
        }
        if hay_char == needle[cursor] {
            cursor += 1;
            run += 1;
            score = score.saturating_add(run * 2);
        } else {
            run = 0;
        }
    }

    if cursor == needle.len() {
        score
    } else {
        0
    }
}

fn name_words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '.'))
        .filter(|word| !word.is_empty())
}

/// Returns the rest of `text` after a case-insensitive `prefix`, keeping the
/// original casing of the remainder.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.trim().is_empty() {
        return None;
    }

    let mut rest = text.char_indices();
    let mut offset = 0;
    for prefix_char in prefix.chars() {
        let (index, text_char) = rest.next()?;
        if !text_char.to_lowercase().eq(prefix_char.to_lowercase()) {
            return None;
        }
        offset = index + text_char.len_utf8();
    }
    Some(&text[offset..])
}
