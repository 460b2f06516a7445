//! Pure helpers over lists, maps and sets: text cleanup, counting,
//! grouping and sorting by derived keys.

use crate::utils::text::{normalize_name, normalize_whitespace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Normalizes raw customer names: trim, collapse internal whitespace,
/// Title Case, drop entries that normalize to empty, and dedupe keeping
/// the first occurrence.
pub fn clean_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in names {
        let norm = normalize_name(raw);
        if !norm.is_empty() && seen.insert(norm.clone()) {
            out.push(norm);
        }
    }
    out
}

/// Passwords of length >= 8 containing at least one letter and one digit.
pub fn valid_passwords<'a>(passwords: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    passwords
        .into_iter()
        .filter(|pw| {
            pw.chars().count() >= 8
                && pw.chars().any(|c| c.is_alphabetic())
                && pw.chars().any(|c| c.is_ascii_digit())
        })
        .map(str::to_string)
        .collect()
}

/// Counts, per user, the log entries with HTTP status 200.
pub fn count_ok_accesses(log: &[(String, u16)]) -> HashMap<String, usize> {
    let mut out = HashMap::new();
    for (user, status) in log {
        if *status == 200 {
            *out.entry(user.clone()).or_insert(0) += 1;
        }
    }
    out
}

/// Weighted mean of `(value, weight)` pairs. A weight sum of zero yields
/// 0.0, never a division error.
pub fn weighted_mean(grades: &HashMap<String, (f64, f64)>) -> f64 {
    let num: f64 = grades.values().map(|(v, w)| v * w).sum();
    let den: f64 = grades.values().map(|(_, w)| w).sum();
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Key-wise sum of two inventories; neither input is mutated.
pub fn merge_inventories(
    a: &HashMap<String, i64>,
    b: &HashMap<String, i64>,
) -> HashMap<String, i64> {
    let mut out = a.clone();
    for (k, v) in b {
        *out.entry(k.clone()).or_insert(0) += v;
    }
    out
}

/// Maps a priority label to a score; unknown labels score 0.
pub fn priority_score(label: &str) -> u8 {
    match label.to_lowercase().as_str() {
        "critical" => 3,
        "high" => 2,
        "medium" => 1,
        _ => 0,
    }
}

/// Sorts `(title, priority_label)` pairs by descending priority score,
/// ties broken alphabetically by title, case-insensitive.
pub fn sort_by_priority(tasks: &[(String, String)]) -> Vec<(String, String)> {
    let mut out = tasks.to_vec();
    out.sort_by_key(|(title, label)| (std::cmp::Reverse(priority_score(label)), title.to_lowercase()));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub category: String,
    pub amount: f64,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    /// Per-category breakdown, signed: income positive, expense negative.
    pub by_category: BTreeMap<String, f64>,
}

pub fn balance_summary(transactions: &[Transaction]) -> BalanceSummary {
    let mut summary = BalanceSummary::default();
    for tx in transactions {
        let entry = summary.by_category.entry(tx.category.clone()).or_insert(0.0);
        match tx.kind {
            TransactionKind::Income => {
                summary.total_income += tx.amount;
                *entry += tx.amount;
            }
            TransactionKind::Expense => {
                summary.total_expense += tx.amount;
                *entry -= tx.amount;
            }
        }
    }
    summary.net = summary.total_income - summary.total_expense;
    summary
}

/// Lowercase alphanumeric tokens of length >= `min_len` that are not
/// stopwords (stopword comparison is case-insensitive).
pub fn extract_keywords<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    stopwords: &HashSet<String>,
    min_len: usize,
) -> BTreeSet<String> {
    let stop: HashSet<String> = stopwords.iter().map(|s| s.to_lowercase()).collect();
    let mut out = BTreeSet::new();
    for text in texts {
        for token in normalize_whitespace(&text.to_lowercase()).split(' ') {
            if !token.is_empty()
                && token.chars().all(|c| c.is_alphanumeric())
                && token.chars().count() >= min_len
                && !stop.contains(token)
            {
                out.insert(token.to_string());
            }
        }
    }
    out
}

/// First value whose square exceeds the threshold, with its index.
pub fn first_square_above(numbers: &[i64], threshold: i64) -> Option<(i64, usize)> {
    numbers
        .iter()
        .enumerate()
        .find(|(_, n)| *n * *n > threshold)
        .map(|(i, n)| (*n, i))
}

/// Groups words by anagram key: the sorted letters of the lowercased
/// word. Group membership preserves input arrival order.
pub fn group_anagrams<'a>(words: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for word in words {
        let mut letters: Vec<char> = word.to_lowercase().chars().collect();
        letters.sort_unstable();
        let key: String = letters.into_iter().collect();
        groups.entry(key).or_default().push(word.to_string());
    }
    groups
}
