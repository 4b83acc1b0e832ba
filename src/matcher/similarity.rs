//! Similarity scoring primitives for the fuzzy fallback.

use std::collections::HashSet;

use crate::analysis::text::TextNormalizer;

/// Weight of the character-sequence ratio inside the blended similarity.
const SEQUENCE_BLEND: f64 = 0.4;
/// Weight of the token Jaccard overlap inside the blended similarity.
const TOKEN_BLEND: f64 = 0.6;

/// Ratcliff–Obershelp ratio: `2·M / (|a| + |b|)` where `M` is the total
/// length of recursively-found longest matching blocks. 1.0 when both
/// strings are empty.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_total(&a, &b) as f64 / total as f64
}

fn matching_total(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (i, j, k) = longest_match(a, b);
    if k == 0 {
        return 0;
    }
    k + matching_total(&a[..i], &b[..j]) + matching_total(&a[i + k..], &b[j + k..])
}

/// Longest common substring as `(start_a, start_b, len)`, preferring the
/// earliest start in `a` on ties.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut curr = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                curr[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = curr;
    }
    best
}

/// Jaccard overlap of two token sets.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Blended text similarity: sequence ratio and token Jaccard at 0.4/0.6,
/// falling back to the sequence ratio alone when either side has no
/// content tokens.
pub fn blended_similarity(normalizer: &TextNormalizer, a: &str, b: &str) -> f64 {
    let seq = sequence_ratio(&a.to_lowercase(), &b.to_lowercase());
    let tokens_a: HashSet<String> = normalizer.tokenize(a).into_iter().collect();
    let tokens_b: HashSet<String> = normalizer.tokenize(b).into_iter().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return seq;
    }
    seq * SEQUENCE_BLEND + jaccard(&tokens_a, &tokens_b) * TOKEN_BLEND
}
