// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query evaluator: walks an [`Expr`] tree, expanding each leaf against the
//! term dictionary, scoring matches, and combining subtrees by set
//! intersection (`And`) or union (`Or`) with score summation (`spec.md`
//! §4.5).
//!
//! For a `Word` leaf, several dictionary terms can match (the word itself,
//! prefix extensions, fuzzy neighbors); a document's contribution from that
//! leaf is the *best-scoring single expansion*, not the sum over all of
//! them — matching a document on both "cat" and its fuzzy neighbor "car"
//! should count once, as a hit on that word, not twice.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Expr;
use crate::inverted::InvertedIndex;
use crate::registry::Registry;
use crate::scoring::{idf, score_field_match, BmParams, FieldBoosts, MatchKind};
use crate::types::{DocId, FieldId};

/// Knobs the evaluator and autosuggest both need: BM25 parameters, field
/// boosts, and how far fuzzy expansion is allowed to reach.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    pub bm: BmParams,
    pub boosts: FieldBoosts,
    /// Maximum Levenshtein distance for fuzzy expansion of `Word` leaves.
    /// `0` disables fuzzy matching (prefix expansion still applies).
    pub fuzzy_distance: usize,
    /// Whether `Word` leaves also match by prefix, not just exact + fuzzy.
    pub prefix_expansion: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            bm: BmParams::default(),
            boosts: FieldBoosts::default(),
            fuzzy_distance: 1,
            prefix_expansion: true,
        }
    }
}

/// For one document, which dictionary terms matched and in which declared
/// fields each one occurred — `spec.md` §6: "`match` is a mapping from
/// matched term to the list of field names in which it occurred".
pub type MatchInfo = HashMap<String, Vec<String>>;

fn merge_match_info(into: &mut MatchInfo, from: &MatchInfo) {
    for (term, fields) in from {
        let slot = into.entry(term.clone()).or_default();
        for f in fields {
            if !slot.contains(f) {
                slot.push(f.clone());
            }
        }
    }
}

/// Evaluate `expr` against `index`/`registry`, returning each matching
/// document's combined score and match info (unordered; the caller sorts
/// and truncates as it likes). `field_names` is indexed by `FieldId`, used
/// to translate postings back to the field names `spec.md` §6 wants in the
/// result's `match` map.
pub fn evaluate<Id>(
    expr: &Expr,
    index: &InvertedIndex,
    registry: &Registry<Id>,
    field_names: &[String],
    opts: &EvalOptions,
) -> HashMap<DocId, (f64, MatchInfo)>
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    match expr {
        Expr::Word(term) => leaf_scores(term, false, index, registry, field_names, opts),
        Expr::Exact(term) => leaf_scores(term, true, index, registry, field_names, opts),
        Expr::And(children) => {
            let mut maps = children.iter().map(|c| evaluate(c, index, registry, field_names, opts));
            let Some(first) = maps.next() else {
                return HashMap::new();
            };
            maps.fold(first, |acc, next| {
                acc.into_iter()
                    .filter_map(|(doc, (score, mut info))| {
                        next.get(&doc).map(|(other_score, other_info)| {
                            merge_match_info(&mut info, other_info);
                            (doc, (score + other_score, info))
                        })
                    })
                    .collect()
            })
        }
        Expr::Or(children) => {
            let mut combined: HashMap<DocId, (f64, MatchInfo)> = HashMap::new();
            for child in children {
                for (doc, (score, info)) in evaluate(child, index, registry, field_names, opts) {
                    let slot = combined.entry(doc).or_insert((0.0, MatchInfo::new()));
                    slot.0 += score;
                    merge_match_info(&mut slot.1, &info);
                }
            }
            combined
        }
    }
}

/// Candidate dictionary terms for a `Word` leaf: the term itself if
/// present, its prefix extensions, and its fuzzy neighbors, each tagged
/// with how it was matched. An `Exact` leaf only ever produces one
/// candidate: the literal term, unexpanded.
fn candidates(term: &str, exact_only: bool, index: &InvertedIndex, opts: &EvalOptions) -> Vec<(String, MatchKind)> {
    let query_len = term.chars().count().max(1);
    let mut out = Vec::new();
    if exact_only {
        if index.tree().contains(term) {
            out.push((term.to_string(), MatchKind::Exact));
        }
        return out;
    }
    if index.tree().contains(term) {
        out.push((term.to_string(), MatchKind::Exact));
    }
    if opts.prefix_expansion {
        for (matched, _) in index.tree().at_prefix(term).entries() {
            if matched != term {
                let expansion_len = matched.chars().count().max(1);
                out.push((matched, MatchKind::Prefix { query_len, expansion_len }));
            }
        }
    }
    if opts.fuzzy_distance > 0 {
        for (matched, distance) in index.tree().fuzzy_get(term, opts.fuzzy_distance) {
            if matched != term && distance > 0 {
                out.push((matched, MatchKind::Fuzzy { distance, query_len }));
            }
        }
    }
    out
}

fn leaf_scores<Id>(
    term: &str,
    exact_only: bool,
    index: &InvertedIndex,
    registry: &Registry<Id>,
    field_names: &[String],
    opts: &EvalOptions,
) -> HashMap<DocId, (f64, MatchInfo)>
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    let total_docs = registry.document_count();
    let mut best: HashMap<DocId, (f64, MatchInfo)> = HashMap::new();
    for (matched, kind) in candidates(term, exact_only, index, opts) {
        let Some(postings) = index.postings(&matched) else {
            continue;
        };
        let df = index.document_frequency(&matched);
        let idf_value = idf(total_docs, df);
        let mut per_doc_total: HashMap<DocId, (f64, MatchInfo)> = HashMap::new();
        for (field, per_doc) in postings {
            let avg_len = registry.avg_field_len(*field);
            let boost = opts.boosts.get(*field);
            let field_name = field_name_of(field_names, *field);
            for (doc, tf) in per_doc {
                let field_len = registry.field_length(*doc, *field);
                let score = score_field_match(opts.bm, idf_value, *tf, field_len, avg_len, boost, kind);
                let slot = per_doc_total.entry(*doc).or_insert((0.0, MatchInfo::new()));
                slot.0 += score;
                if let Some(name) = &field_name {
                    let fields = slot.1.entry(matched.clone()).or_default();
                    if !fields.contains(name) {
                        fields.push(name.clone());
                    }
                }
            }
        }
        for (doc, (score, info)) in per_doc_total {
            let entry = best.entry(doc).or_insert((0.0, MatchInfo::new()));
            if score > entry.0 {
                *entry = (score, info);
            }
        }
    }
    best
}

fn field_name_of(field_names: &[String], field: FieldId) -> Option<String> {
    field_names.get(field.as_usize()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldId;

    fn fixture() -> (InvertedIndex, Registry<String>, Vec<String>) {
        let mut index = InvertedIndex::new();
        let mut registry: Registry<String> = Registry::new();
        let f = FieldId(0);

        let doc_a = registry.register("a".to_string()).unwrap();
        let terms_a = vec!["rust".to_string(), "programming".to_string()];
        for t in &terms_a {
            index.add_occurrence(t, f, doc_a);
        }
        registry.set_field(doc_a, f, "rust programming", terms_a);

        let doc_b = registry.register("b".to_string()).unwrap();
        let terms_b = vec!["python".to_string(), "programming".to_string()];
        for t in &terms_b {
            index.add_occurrence(t, f, doc_b);
        }
        registry.set_field(doc_b, f, "python programming", terms_b);

        (index, registry, vec!["title".to_string()])
    }

    #[test]
    fn word_leaf_matches_exact_term() {
        let (index, registry, fields) = fixture();
        let expr = Expr::Word("rust".to_string());
        let scores = evaluate(&expr, &index, &registry, &fields, &EvalOptions::default());
        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key(&DocId(0)));
        let (_, info) = &scores[&DocId(0)];
        assert_eq!(info.get("rust"), Some(&vec!["title".to_string()]));
    }

    #[test]
    fn and_requires_both_terms() {
        let (index, registry, fields) = fixture();
        let expr = Expr::And(vec![
            Expr::Word("programming".to_string()),
            Expr::Word("rust".to_string()),
        ]);
        let scores = evaluate(&expr, &index, &registry, &fields, &EvalOptions::default());
        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key(&DocId(0)));
        let (_, info) = &scores[&DocId(0)];
        assert!(info.contains_key("programming"));
        assert!(info.contains_key("rust"));
    }

    #[test]
    fn or_unions_documents() {
        let (index, registry, fields) = fixture();
        let expr = Expr::Or(vec![
            Expr::Word("rust".to_string()),
            Expr::Word("python".to_string()),
        ]);
        let scores = evaluate(&expr, &index, &registry, &fields, &EvalOptions::default());
        assert_eq!(scores.len(), 2);
    }

    #[test]
    fn common_term_scores_both_docs_via_or_sum() {
        let (index, registry, fields) = fixture();
        let expr = Expr::Word("programming".to_string());
        let scores = evaluate(&expr, &index, &registry, &fields, &EvalOptions::default());
        assert_eq!(scores.len(), 2);
    }

    #[test]
    fn exact_leaf_skips_fuzzy_expansion() {
        let (index, registry, fields) = fixture();
        let expr = Expr::Exact("rus".to_string());
        let scores = evaluate(&expr, &index, &registry, &fields, &EvalOptions::default());
        assert!(scores.is_empty());
    }

    #[test]
    fn word_leaf_expands_by_prefix() {
        let (index, registry, fields) = fixture();
        let expr = Expr::Word("prog".to_string());
        let scores = evaluate(&expr, &index, &registry, &fields, &EvalOptions::default());
        assert_eq!(scores.len(), 2);
    }
}
