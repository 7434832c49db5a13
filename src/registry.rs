// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document registry: external id ↔ internal `DocId` mapping, per-field
//! token bookkeeping for BM25 length normalization, and stored field values
//! (`spec.md` §3, §4.2).
//!
//! Generic over the caller's own id type rather than a fixed `String` or
//! enum — a host indexing database rows wants `Id = i64`, a host indexing
//! files wants `Id = PathBuf`. The only requirements are the ones any
//! hash-map key needs, plus `Serialize`/`DeserializeOwned` for the snapshot
//! codec.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{Error, Result};
use crate::types::{DocId, FieldId};

/// A single field's worth of recorded content for one document: the term
/// multiset produced by the tokenizer/term-processor pipeline at `add`
/// time, kept around so `remove` can subtract exactly what was added
/// without re-tokenizing (`spec.md` §9 Open Question, resolved in
/// `DESIGN.md` in favor of storing at add time).
pub type TermMultiset = Vec<String>;

#[derive(Debug, Clone)]
struct DocumentRecord<Id> {
    external_id: Id,
    /// Term multiset per field, as it was indexed.
    field_terms: HashMap<FieldId, TermMultiset>,
    /// Token count per field (== field_terms[f].len(), cached for scoring).
    field_lengths: HashMap<FieldId, u32>,
    /// Raw field values as handed to `add`, for `storedFields` retrieval.
    stored: HashMap<FieldId, String>,
}

/// External-id ↔ internal-id mapping and per-document length bookkeeping.
///
/// Internal ids are dense and monotonically assigned (`spec.md` §3,
/// invariant I3); a removed id is never reassigned before the registry is
/// rebuilt from a snapshot or compacted, so the radix tree's posting lists
/// never observe id reuse mid-epoch.
#[derive(Debug, Clone)]
pub struct Registry<Id> {
    next_internal: u32,
    external_to_internal: HashMap<Id, DocId>,
    records: HashMap<DocId, DocumentRecord<Id>>,
    /// Running sum of field lengths across all *live* documents, keyed by
    /// field, used to compute `avg_field_len` without a full rescan.
    sum_field_len: HashMap<FieldId, u64>,
}

impl<Id> Default for Registry<Id> {
    fn default() -> Self {
        Registry {
            next_internal: 0,
            external_to_internal: HashMap::new(),
            records: HashMap::new(),
            sum_field_len: HashMap::new(),
        }
    }
}

impl<Id> Registry<Id>
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.external_to_internal.contains_key(id)
    }

    pub fn internal_id(&self, id: &Id) -> Option<DocId> {
        self.external_to_internal.get(id).copied()
    }

    pub fn external_id(&self, doc: DocId) -> Option<&Id> {
        self.records.get(&doc).map(|r| &r.external_id)
    }

    /// Register a new document, returning its freshly minted internal id.
    /// Returns `Error::DuplicateId` if `external_id` is already live.
    pub fn register(&mut self, external_id: Id) -> Result<DocId> {
        let doc = DocId(self.next_internal);
        self.insert_record(doc, external_id)?;
        self.next_internal += 1;
        Ok(doc)
    }

    /// Register a document at a caller-chosen internal id, advancing
    /// `next_internal` past it. Used only by [`crate::snapshot::restore_snapshot`]
    /// to reinstate the exact `DocId`s a snapshot's inverted-index postings
    /// were serialized against — `register`'s own dense, from-zero
    /// assignment would desynchronize the restored registry from the
    /// restored index the moment a snapshot has a gap in its live ids
    /// (`spec.md` §3 invariant I3, §8's round-trip property).
    pub fn register_at(&mut self, doc: DocId, external_id: Id) -> Result<()> {
        self.insert_record(doc, external_id)?;
        self.next_internal = self.next_internal.max(doc.0 + 1);
        Ok(())
    }

    fn insert_record(&mut self, doc: DocId, external_id: Id) -> Result<()> {
        if self.external_to_internal.contains_key(&external_id) {
            return Err(Error::DuplicateId(format!("{external_id:?}")));
        }
        self.external_to_internal.insert(external_id.clone(), doc);
        self.records.insert(
            doc,
            DocumentRecord {
                external_id,
                field_terms: HashMap::new(),
                field_lengths: HashMap::new(),
                stored: HashMap::new(),
            },
        );
        Ok(())
    }

    /// Record field content for a just-registered document. Called once per
    /// field at `add` time, before the inverted index is updated with the
    /// same terms.
    pub fn set_field(&mut self, doc: DocId, field: FieldId, raw: &str, terms: TermMultiset) {
        let len = terms.len() as u32;
        if let Some(record) = self.records.get_mut(&doc) {
            record.stored.insert(field, raw.to_string());
            record.field_terms.insert(field, terms);
            record.field_lengths.insert(field, len);
        }
        *self.sum_field_len.entry(field).or_insert(0) += u64::from(len);
    }

    /// Remove a document, returning its field term multisets (for the
    /// caller to subtract from the inverted index) if it was live.
    pub fn unregister(&mut self, external_id: &Id) -> Result<(DocId, HashMap<FieldId, TermMultiset>)> {
        let doc = self
            .external_to_internal
            .remove(external_id)
            .ok_or_else(|| Error::UnknownDocument(format!("{external_id:?}")))?;
        let record = self.records.remove(&doc).expect("registry record exists for live id");
        for (field, len) in &record.field_lengths {
            if let Some(sum) = self.sum_field_len.get_mut(field) {
                *sum = sum.saturating_sub(u64::from(*len));
            }
        }
        Ok((doc, record.field_terms))
    }

    pub fn field_terms(&self, doc: DocId, field: FieldId) -> Option<&TermMultiset> {
        self.records.get(&doc).and_then(|r| r.field_terms.get(&field))
    }

    pub fn field_length(&self, doc: DocId, field: FieldId) -> u32 {
        self.records
            .get(&doc)
            .and_then(|r| r.field_lengths.get(&field))
            .copied()
            .unwrap_or(0)
    }

    /// Mean token count for `field` across all live documents. `0.0` when
    /// no live document has the field, so the scorer's normalization term
    /// degrades to a no-op rather than dividing by zero.
    pub fn avg_field_len(&self, field: FieldId) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let sum = self.sum_field_len.get(&field).copied().unwrap_or(0);
        sum as f64 / self.records.len() as f64
    }

    pub fn stored_field(&self, doc: DocId, field: FieldId) -> Option<&str> {
        self.records.get(&doc).and_then(|r| r.stored.get(field)).map(String::as_str)
    }

    pub fn live_doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.records.keys().copied()
    }

    pub fn document_count(&self) -> usize {
        self.records.len()
    }

    /// Total internal ids ever handed out, live or not. Used by
    /// `contracts` to check that no live id exceeds this bound.
    pub fn ids_ever_issued(&self) -> u32 {
        self.next_internal
    }
}
