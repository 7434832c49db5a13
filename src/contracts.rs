// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Debug-only runtime contracts for the invariants in `spec.md` §3
//! (I1-I5). Every check here is a `debug_assert!` — a violation is a bug in
//! this crate, not a condition a caller can trigger, so these compile out
//! entirely in release builds.

use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::inverted::InvertedIndex;
use crate::registry::Registry;

/// I1: every term reachable from the radix tree has at least one posting.
pub fn check_no_empty_postings(index: &InvertedIndex) {
    for (term, postings) in index.tree().entries() {
        debug_assert!(
            !postings.is_empty(),
            "term '{term}' has an empty posting list; remove_occurrences should have pruned it"
        );
        for (field, per_doc) in postings {
            debug_assert!(
                !per_doc.is_empty(),
                "term '{term}' field {field:?} has an empty doc map"
            );
        }
    }
}

/// I2: a term's document frequency never exceeds the live document count.
pub fn check_doc_freq_bounded<Id>(index: &InvertedIndex, registry: &Registry<Id>)
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    let total = registry.document_count();
    for (term, _) in index.tree().entries() {
        debug_assert!(
            index.document_frequency(&term) <= total,
            "document frequency of '{term}' exceeds live document count"
        );
    }
}

/// I3: internal ids are dense and monotonic — no live id's raw value
/// exceeds the number of documents ever registered.
pub fn check_ids_within_bounds<Id>(registry: &Registry<Id>, ids_ever_issued: u32)
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    for doc in registry.live_doc_ids() {
        debug_assert!(
            doc.0 < ids_ever_issued,
            "live document id {} exceeds ids ever issued ({ids_ever_issued})",
            doc.0
        );
    }
}

/// I4: a field's average length is non-negative and zero only when no live
/// document has that field.
pub fn check_avg_len_non_negative<Id>(registry: &Registry<Id>, field: crate::types::FieldId)
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    debug_assert!(registry.avg_field_len(field) >= 0.0, "avg_field_len must be non-negative");
}

/// I5: every posting's document id corresponds to a still-live document.
pub fn check_postings_reference_live_docs<Id>(index: &InvertedIndex, registry: &Registry<Id>)
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    for (term, postings) in index.tree().entries() {
        for (_, per_doc) in postings {
            for doc in per_doc.keys() {
                debug_assert!(
                    registry.external_id(*doc).is_some(),
                    "term '{term}' posts to doc {doc:?} which is not live in the registry"
                );
            }
        }
    }
}
