// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted index: term → field → document → occurrence count, keyed by
//! the radix tree's term dictionary (`spec.md` §4.2).

use std::collections::BTreeMap;

use crate::radix::RadixTree;
use crate::types::{DocId, FieldId};

/// Per-field occurrence counts for a single term, across all documents that
/// contain it. `BTreeMap` keeps document iteration order deterministic,
/// which the evaluator's tie-breaking relies on.
pub type PostingList = BTreeMap<FieldId, BTreeMap<DocId, u32>>;

/// The term dictionary plus its postings. A thin wrapper around
/// `RadixTree<PostingList>` rather than a bare type alias so the counting
/// and cleanup rules around adding/removing occurrences live in one place.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    tree: RadixTree<PostingList>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &RadixTree<PostingList> {
        &self.tree
    }

    /// Record one occurrence of `term` in `field` of `doc`.
    pub fn add_occurrence(&mut self, term: &str, field: FieldId, doc: DocId) {
        let postings = self.tree.entry_or_insert_with(term, PostingList::new);
        *postings.entry(field).or_default().entry(doc).or_insert(0) += 1;
    }

    /// Remove all occurrences of `term` contributed by `doc` in `field`.
    /// Prunes empty per-field and per-term entries so the dictionary never
    /// retains terms with no live postings.
    pub fn remove_occurrences(&mut self, term: &str, field: FieldId, doc: DocId) {
        let is_empty = {
            let Some(postings) = self.postings_mut(term) else {
                return;
            };
            if let Some(per_doc) = postings.get_mut(&field) {
                per_doc.remove(&doc);
                if per_doc.is_empty() {
                    postings.remove(&field);
                }
            }
            postings.is_empty()
        };
        if is_empty {
            self.tree.remove(term);
        }
    }

    fn postings_mut(&mut self, term: &str) -> Option<&mut PostingList> {
        // RadixTree doesn't expose get_mut directly; entry_or_insert_with
        // with a default that is never invoked for an absent key would
        // wrongly create one, so fall back through entries() for absence
        // checks and mutate via a focused lookup instead.
        if !self.tree.contains(term) {
            return None;
        }
        Some(self.tree.entry_or_insert_with(term, PostingList::new))
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.tree.get(term)
    }

    /// Number of distinct documents containing `term`, in any field —
    /// `spec.md` §4.3's `df(t)` for the IDF term.
    pub fn document_frequency(&self, term: &str) -> usize {
        match self.tree.get(term) {
            None => 0,
            Some(postings) => {
                let mut docs: Vec<DocId> = postings.values().flat_map(|m| m.keys().copied()).collect();
                docs.sort_unstable();
                docs.dedup();
                docs.len()
            }
        }
    }

    pub fn term_count(&self) -> usize {
        self.tree.entries().len()
    }
}
