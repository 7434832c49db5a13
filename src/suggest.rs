// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Autosuggest: turns a partial, space-separated query into ranked
//! completion suggestions (`spec.md` §4.6).
//!
//! Each word of the input is expanded independently against the term
//! dictionary (exact, prefix, and fuzzy matches, same as a `Word` query
//! leaf), then the Cartesian product of those per-word expansions forms
//! candidate completions, each scored as an implicit `AND` of its
//! constituent terms. The product is bounded by [`SuggestOptions::max_combinations`]
//! so a query of several typo-laden words can't blow up combinatorially;
//! anything beyond the cap is dropped and logged at `debug`, never panics.

use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::inverted::InvertedIndex;
use crate::query::eval::EvalOptions;
use crate::registry::Registry;
use crate::scoring::{idf, score_field_match, MatchKind};
use crate::tokenize::{TermProcessor, Tokenizer};
use crate::types::DocId;

#[derive(Debug, Clone)]
pub struct SuggestOptions {
    pub eval: EvalOptions,
    /// Upper bound on the Cartesian product size across all words' per-word
    /// expansion counts. Default 64, per `spec.md` §9's non-goals note.
    pub max_combinations: usize,
    /// How many ranked suggestions to return.
    pub limit: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        SuggestOptions {
            eval: EvalOptions::default(),
            max_combinations: 64,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub text: String,
    pub score: f64,
}

/// Produce ranked completion suggestions for `input` against `index`.
pub fn suggest<Id>(
    input: &str,
    index: &InvertedIndex,
    registry: &Registry<Id>,
    tokenizer: &dyn Tokenizer,
    processor: &dyn TermProcessor,
    opts: &SuggestOptions,
) -> Vec<Suggestion>
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    let words = crate::tokenize::terms_of(tokenizer, processor, input);
    if words.is_empty() {
        return Vec::new();
    }

    let per_word: Vec<Vec<(String, MatchKind)>> = words
        .iter()
        .map(|w| word_candidates(w, index, &opts.eval))
        .collect();

    if per_word.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let total_combinations: usize = per_word.iter().map(Vec::len).product();
    let truncated = total_combinations > opts.max_combinations;
    if truncated {
        log::debug!(
            "autosuggest: {total_combinations} combinations exceeds cap {}, truncating",
            opts.max_combinations
        );
    }

    let mut combos: Vec<Vec<(String, MatchKind)>> = vec![Vec::new()];
    'build: for word_choices in &per_word {
        let mut next = Vec::new();
        for prefix in &combos {
            for choice in word_choices {
                if next.len() >= opts.max_combinations {
                    break 'build;
                }
                let mut extended = prefix.clone();
                extended.push(choice.clone());
                next.push(extended);
            }
        }
        combos = next;
    }

    let total_docs = registry.document_count();
    let mut suggestions: Vec<Suggestion> = Vec::new();
    for combo in combos {
        if combo.len() != per_word.len() {
            continue;
        }
        let text = combo.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>().join(" ");
        let score = combo
            .iter()
            .map(|(term, kind)| combo_term_score(term, *kind, index, registry, total_docs, &opts.eval))
            .sum();
        suggestions.push(Suggestion { text, score });
    }

    // Different combos can spell out the same phrase (e.g. an exact match on
    // one word and a prefix expansion landing on the same text via another);
    // §4.6 wants those folded into one suggestion with summed scores, not
    // the first occurrence kept and the rest silently discarded.
    let mut by_text: Vec<Suggestion> = Vec::new();
    for s in suggestions {
        if let Some(existing) = by_text.iter_mut().find(|e| e.text == s.text) {
            existing.score += s.score;
        } else {
            by_text.push(s);
        }
    }

    by_text.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.text.cmp(&b.text))
    });
    by_text.truncate(opts.limit);
    by_text
}

fn word_candidates(word: &str, index: &InvertedIndex, opts: &EvalOptions) -> Vec<(String, MatchKind)> {
    let query_len = word.chars().count().max(1);
    let mut out = Vec::new();
    if index.tree().contains(word) {
        out.push((word.to_string(), MatchKind::Exact));
    }
    if opts.prefix_expansion {
        for (matched, _) in index.tree().at_prefix(word).entries() {
            if matched != word {
                let expansion_len = matched.chars().count().max(1);
                out.push((matched, MatchKind::Prefix { query_len, expansion_len }));
            }
        }
    }
    if opts.fuzzy_distance > 0 {
        for (matched, distance) in index.tree().fuzzy_get(word, opts.fuzzy_distance) {
            if matched != word && distance > 0 {
                out.push((matched, MatchKind::Fuzzy { distance, query_len }));
            }
        }
    }
    out
}

fn combo_term_score<Id>(
    term: &str,
    kind: MatchKind,
    index: &InvertedIndex,
    registry: &Registry<Id>,
    total_docs: usize,
    opts: &EvalOptions,
) -> f64
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    let Some(postings) = index.postings(term) else {
        return 0.0;
    };
    let df = index.document_frequency(term);
    let idf_value = idf(total_docs, df);
    let mut best_doc_total: f64 = 0.0;
    let mut totals: std::collections::HashMap<DocId, f64> = std::collections::HashMap::new();
    for (field, per_doc) in postings {
        let avg_len = registry.avg_field_len(*field);
        let boost = opts.boosts.get(*field);
        for (doc, tf) in per_doc {
            let field_len = registry.field_length(*doc, *field);
            let score = score_field_match(opts.bm, idf_value, *tf, field_len, avg_len, boost, kind);
            let entry = totals.entry(*doc).or_insert(0.0);
            *entry += score;
            if *entry > best_doc_total {
                best_doc_total = *entry;
            }
        }
    }
    best_doc_total
}
