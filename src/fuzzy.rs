//! Weighted-ratio fuzzy matching of free-text queries against catalog names.
//!
//! Scores are on a 0-100 scale. The base edit similarity comes from `strsim`;
//! the weighting mirrors the usual "WRatio" blend of full, partial, and
//! token-based ratios so that `"biryan"` still finds `"Veg Biryani"`.

use std::collections::BTreeSet;

/// Minimum score a name needs to be suggested
pub const SCORE_CUTOFF: f64 = 40.0;

/// Maximum number of suggestions returned
pub const SUGGESTION_LIMIT: usize = 8;

/// Queries are cut to this many characters before scoring
pub const MAX_QUERY_CHARS: usize = 200;

/// A scored candidate
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub choice: &'a str,
    pub score: f64,
    pub index: usize,
}

/// Score every choice against `query`, keep those at or above `cutoff`,
/// and return the best `limit` by descending score. Ties keep input order.
pub fn extract<'a, S: AsRef<str>>(
    query: &str,
    choices: &'a [S],
    limit: usize,
    cutoff: f64,
) -> Vec<Match<'a>> {
    let query: String = normalize(query).chars().take(MAX_QUERY_CHARS).collect();
    let query = query.trim_end();
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<Match<'a>> = choices
        .iter()
        .enumerate()
        .filter_map(|(index, choice)| {
            let choice = choice.as_ref();
            let score = weighted_ratio_normalized(query, &normalize(choice));
            (score >= cutoff).then_some(Match {
                choice,
                score,
                index,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    matches.truncate(limit);
    matches
}

/// Convenience wrapper returning only the suggested names
pub fn suggest<S: AsRef<str>>(query: &str, choices: &[S]) -> Vec<String> {
    extract(query, choices, SUGGESTION_LIMIT, SCORE_CUTOFF)
        .into_iter()
        .map(|m| m.choice.to_string())
        .collect()
}

/// Weighted ratio of two raw strings
#[cfg(test)]
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    weighted_ratio_normalized(&normalize(a), &normalize(b))
}

fn weighted_ratio_normalized(a: &str, b: &str) -> f64 {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let base = ratio(a, b);
    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;

    if len_ratio < 1.5 {
        return base.max(token_ratio(a, b) * 0.95);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    base.max(partial_ratio(a, b) * partial_scale)
        .max(partial_token_ratio(a, b) * 0.95 * partial_scale)
}

/// Lowercase, map non-alphanumerics to spaces, collapse whitespace
fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best ratio of the shorter string against any equal-length window of the longer
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    let long_chars: Vec<char> = long.chars().collect();
    if short_len == 0 {
        return 0.0;
    }

    let mut best: f64 = 0.0;
    let mut candidate = String::with_capacity(short.len());
    for window in long_chars.windows(short_len) {
        candidate.clear();
        candidate.extend(window);
        best = best.max(ratio(short, &candidate));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_set(s: &str) -> BTreeSet<&str> {
    s.split_whitespace().collect()
}

/// Intersection plus sorted remainders, as used by token-set scoring
fn token_set_parts(a: &str, b: &str) -> (String, String, String) {
    let (set_a, set_b) = (token_set(a), token_set(b));
    let join = |it: Vec<&str>| it.join(" ");
    let common = join(set_a.intersection(&set_b).copied().collect());
    let only_a = join(set_a.difference(&set_b).copied().collect());
    let only_b = join(set_b.difference(&set_a).copied().collect());

    let combine = |rest: String| match (common.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => common.clone(),
        (false, false) => format!("{common} {rest}"),
    };
    let with_a = combine(only_a);
    let with_b = combine(only_b);
    (common.clone(), with_a, with_b)
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let (common, with_a, with_b) = token_set_parts(a, b);
    let mut best = ratio(&with_a, &with_b);
    if !common.is_empty() {
        best = best.max(ratio(&common, &with_a)).max(ratio(&common, &with_b));
    }
    best
}

fn token_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b)).max(token_set_ratio(a, b))
}

fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let (common, _, _) = token_set_parts(a, b);
    if !common.is_empty() {
        return 100.0;
    }
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}
