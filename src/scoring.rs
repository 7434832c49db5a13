// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Okapi BM25 scorer with a penalty for non-exact term expansions
//! (`spec.md` §4.3).
//!
//! The formula follows the textbook presentation: `idf(t) * (k1+1) * tf_norm
//! / (k1 + tf_norm)`, where `tf_norm = tf / (1 - b + b * len / avg_len)`.
//! `k1` and `b` are configurable per [`BmParams`]; the default `b = 0.7`
//! favors shorter-field documents slightly more aggressively than the
//! textbook's `0.75`, per this engine's tuning.

use crate::types::FieldId;

/// Tunable BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmParams {
    /// Term-frequency saturation point. Higher values let repeated terms
    /// keep contributing score for longer before saturating.
    pub k1: f64,
    /// Length-normalization strength, in `[0, 1]`. `0` disables length
    /// normalization entirely; `1` normalizes fully against the field's
    /// average length.
    pub b: f64,
}

impl Default for BmParams {
    fn default() -> Self {
        BmParams { k1: 1.2, b: 0.7 }
    }
}

/// How a query leaf's term was matched against the dictionary. Anything
/// other than an exact match pays a penalty, since a fuzzy or prefix
/// expansion is a weaker signal of relevance than a literal hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    /// `query_len`/`expansion_len` are in characters. The matched dictionary
    /// term is always at least as long as the query word it extends.
    Prefix { query_len: usize, expansion_len: usize },
    /// `distance` is the Levenshtein distance to the query word; `query_len`
    /// is the query word's length in characters.
    Fuzzy { distance: usize, query_len: usize },
}

impl MatchKind {
    /// Multiplier applied to a term's raw BM25 contribution, always `<= 1`
    /// so an exact match never ranks below an expansion of the same query
    /// word (`spec.md` §4.3):
    ///
    /// - prefix: `1 - (expansion_length - query_length) / expansion_length`,
    ///   i.e. the fraction of the matched term the query word actually
    ///   covered.
    /// - fuzzy: `1 - edit_distance / query_length`, clamped to `0` so a
    ///   query word shorter than its edit distance never produces a
    ///   negative penalty.
    pub fn penalty(self) -> f64 {
        match self {
            MatchKind::Exact => 1.0,
            MatchKind::Prefix { query_len, expansion_len } => {
                let expansion_len = expansion_len.max(1) as f64;
                let query_len = query_len as f64;
                (1.0 - (expansion_len - query_len) / expansion_len).clamp(0.0, 1.0)
            }
            MatchKind::Fuzzy { distance, query_len } => {
                let query_len = query_len.max(1) as f64;
                (1.0 - distance as f64 / query_len).clamp(0.0, 1.0)
            }
        }
    }
}

/// Inverse document frequency, clamped at `0` so that terms present in more
/// than half the corpus never contribute a negative score (`spec.md` §4.3).
pub fn idf(total_docs: usize, doc_freq: usize) -> f64 {
    if total_docs == 0 || doc_freq == 0 {
        return 0.0;
    }
    let n = total_docs as f64;
    let df = doc_freq as f64;
    (((n - df + 0.5) / (df + 0.5)) + 1.0).ln().max(0.0)
}

/// BM25 score contribution of a single term occurring `tf` times in one
/// document's field, before the field `boost` and match-kind penalty are
/// applied by the caller.
pub fn bm25_term_score(params: BmParams, idf_value: f64, tf: u32, field_len: u32, avg_field_len: f64) -> f64 {
    if tf == 0 {
        return 0.0;
    }
    let tf = f64::from(tf);
    let len_ratio = if avg_field_len > 0.0 {
        f64::from(field_len) / avg_field_len
    } else {
        1.0
    };
    let tf_norm = tf / (1.0 - params.b + params.b * len_ratio);
    idf_value * (params.k1 + 1.0) * tf_norm / (params.k1 + tf_norm)
}

/// Full per-field score for one matched term: BM25 contribution scaled by
/// the field's configured boost and the match kind's penalty.
pub fn score_field_match(
    params: BmParams,
    idf_value: f64,
    tf: u32,
    field_len: u32,
    avg_field_len: f64,
    field_boost: f64,
    kind: MatchKind,
) -> f64 {
    bm25_term_score(params, idf_value, tf, field_len, avg_field_len) * field_boost * kind.penalty()
}

/// Per-field boost multipliers, indexed by declared field order. Defaults
/// to `1.0` for every field that has no explicit entry.
#[derive(Debug, Clone, Default)]
pub struct FieldBoosts(std::collections::HashMap<FieldId, f64>);

impl FieldBoosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FieldId, boost: f64) {
        self.0.insert(field, boost);
    }

    pub fn get(&self, field: FieldId) -> f64 {
        self.0.get(&field).copied().unwrap_or(1.0)
    }
}
