//! Searchable documents and deterministic scoring
//!
//! Each indexable choice gets one folded document built at insertion from the
//! configured searchable fields. Queries are scored in three tiers, highest
//! first: exact prefix, substring, then token-level matching with a bounded
//! edit distance. Ties always break by insertion order, so an identical
//! `(index content, query)` pair yields an identical ordered result.
//!
//! Placeholder choices are never indexed; inactive choices are skipped at
//! query time. An empty or whitespace-only query means "no filter" and returns
//! nothing here — the pipeline falls back to the unfiltered ordering.

use crate::config::SearchField;
use crate::store::{Choice, ChoiceId, ItemStore};
use std::collections::HashMap;
use tracing::trace;

const TIER_PREFIX: u32 = 1 << 22;
const TIER_SUBSTRING: u32 = 1 << 21;
const TIER_TOKEN: u32 = 1 << 20;

/// A choice id with the match quality of the last search pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored {
    pub id: ChoiceId,
    pub score: u32,
}

// ============================================================================
// Search state
// ============================================================================

/// The current query and the ordered result of the last search pass
#[derive(Debug, Default)]
pub struct SearchState {
    query: String,
    /// Result of the last pass, score-descending with insertion-order ties
    pub results: Vec<Scored>,
}

impl SearchState {
    /// Create an empty search state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query string; results are stale until the next pass
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The raw query as typed
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The trimmed query, when long enough to activate filtering
    ///
    /// Below the floor (or blank after trimming) the engine treats the query
    /// as "no filter", never as an error.
    #[must_use]
    pub fn active_query(&self, floor: usize) -> Option<&str> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty() && trimmed.chars().count() >= floor).then_some(trimmed)
    }

    /// Drop the query and any results
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
    }
}

// ============================================================================
// Index
// ============================================================================

/// Folded per-choice documents over the configured searchable fields
///
/// Indexing is incremental: remote batches insert only their new entries.
#[derive(Debug)]
pub struct SearchIndex {
    fields: Vec<SearchField>,
    docs: HashMap<ChoiceId, Vec<String>>,
}

impl SearchIndex {
    /// Create an index over the given field list
    #[must_use]
    pub fn new(fields: &[SearchField]) -> Self {
        Self {
            fields: fields.to_vec(),
            docs: HashMap::new(),
        }
    }

    /// Build and store the document for a newly inserted choice
    ///
    /// Placeholder entries are never indexed. A declared custom field absent
    /// on the choice folds to the empty string.
    pub fn insert(&mut self, choice: &Choice) {
        if choice.placeholder {
            return;
        }
        let texts = self
            .fields
            .iter()
            .map(|field| match field {
                SearchField::Label => fold(&choice.label),
                SearchField::Value => fold(&choice.value),
                SearchField::Custom(path) => choice
                    .custom
                    .get(path)
                    .and_then(custom_text)
                    .map(|text| fold(&text))
                    .unwrap_or_default(),
            })
            .collect();
        self.docs.insert(choice.id, texts);
    }

    /// Drop the document of a destroyed choice
    pub fn remove(&mut self, id: ChoiceId) {
        self.docs.remove(&id);
    }

    /// Drop every document (full engine reset)
    pub fn clear(&mut self) {
        self.docs.clear();
    }

    /// Number of indexed documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the index holds no documents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Score every active, indexed choice against the query
    ///
    /// Returns matches ordered score-descending; equal scores keep insertion
    /// order. A blank query returns no matches (the caller treats that as
    /// "no filter").
    #[must_use]
    pub fn search(&self, store: &ItemStore, query: &str) -> Vec<Scored> {
        let folded = fold(query);
        let query = folded.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let tokens: Vec<&str> = query.split_whitespace().collect();

        let mut hits = Vec::new();
        for choice in store.choices() {
            if !choice.active || choice.placeholder {
                continue;
            }
            let Some(texts) = self.docs.get(&choice.id) else {
                continue;
            };
            if let Some(score) = score_document(query, &tokens, texts) {
                hits.push(Scored {
                    id: choice.id,
                    score,
                });
            }
        }

        // stable sort: insertion order survives equal scores
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        trace!(query, hits = hits.len(), "search pass");
        hits
    }
}

// ============================================================================
// Scoring
// ============================================================================

fn fold(text: &str) -> String {
    text.to_lowercase()
}

fn custom_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Best field score wins; fields that match nothing contribute nothing
fn score_document(query: &str, tokens: &[&str], texts: &[String]) -> Option<u32> {
    texts
        .iter()
        .filter_map(|text| score_field(query, tokens, text))
        .max()
}

fn score_field(query: &str, tokens: &[&str], text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    if text.starts_with(query) {
        let slack = text.chars().count() - query.chars().count();
        return Some(TIER_PREFIX + 1000 - u32::try_from(slack.min(1000)).unwrap_or(1000));
    }
    if let Some(pos) = text.find(query) {
        return Some(TIER_SUBSTRING + 1000 - u32::try_from(pos.min(1000)).unwrap_or(1000));
    }

    let text_tokens: Vec<&str> = text.split_whitespace().collect();
    let mut sum = 0u32;
    let mut matched = false;
    for token in tokens {
        if let Some(score) = score_token(token, &text_tokens) {
            sum = sum.saturating_add(score);
            matched = true;
        }
    }
    matched.then(|| TIER_TOKEN + sum.min(TIER_TOKEN - 1))
}

/// Best match of one query token against the field's tokens
fn score_token(token: &str, text_tokens: &[&str]) -> Option<u32> {
    let mut best: Option<u32> = None;
    for candidate in text_tokens {
        let score = if candidate == &token {
            900
        } else if candidate.starts_with(token) {
            700
        } else if candidate.contains(token) {
            500
        } else {
            // a full rewrite of the token is not a match, whatever the bound
            let token_chars = token.chars().count();
            let bound = edit_bound(token_chars);
            let dist = rapidfuzz::distance::levenshtein::distance(
                token.chars(),
                candidate.chars(),
            );
            if dist > bound || dist >= token_chars {
                continue;
            }
            300 - u32::try_from(dist * 100).unwrap_or(200).min(200)
        };
        best = Some(best.map_or(score, |b| b.max(score)));
    }
    best
}

/// Edit-distance allowance grows with token length, never below one
const fn edit_bound(token_chars: usize) -> usize {
    let bound = token_chars / 3;
    if bound == 0 { 1 } else { bound }
}
