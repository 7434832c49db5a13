// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Snapshot codec: serializes the full engine state to a `serde`-derived
//! structured document and restores it (`spec.md` §4.7, §6).
//!
//! Unlike a custom compressed binary container, this is deliberately the
//! "JSON-like structured document" `spec.md` calls for — a plain
//! `serde_json::to_string`/`from_str` round trip over [`Snapshot`]. The
//! schema carries a version tag (`__minisearch_schema_version`) so a
//! snapshot produced by an incompatible build is rejected with
//! [`Error::IncompatibleSnapshot`] instead of silently corrupting state.
//!
//! Every nested map uses `BTreeMap`, never `HashMap`: `spec.md` §6 requires
//! the codec to be deterministic ("for a given engine state the output is
//! byte-identical modulo whitespace"), and `serde_json`'s map serialization
//! follows the map's own iteration order — a `HashMap` would make two
//! snapshots of the same state diff on every run.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::inverted::InvertedIndex;
use crate::registry::Registry;
use crate::types::{DocId, FieldId};

/// Current schema version this build writes and accepts. Bumped whenever
/// the shape of [`Snapshot`] changes in a way that isn't forward-readable.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub stored: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot<Id> {
    #[serde(rename = "internalId")]
    pub internal_id: u32,
    #[serde(rename = "externalId")]
    pub external_id: Id,
    pub fields: BTreeMap<String, FieldSnapshot>,
}

/// The full serialized engine state. `index` is `term -> field name ->
/// internal doc id -> count`, the "sorted list of (term, postings)"
/// `spec.md` §4.7 calls for (a `BTreeMap` serializes its keys in sorted
/// order, so this is literally a sorted list on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<Id> {
    #[serde(rename = "__minisearch_schema_version")]
    pub schema_version: u32,
    /// Declared field names, in declaration order; `FieldId(i)` is
    /// `fields[i]`.
    pub fields: Vec<String>,
    #[serde(rename = "storedFields")]
    pub stored_fields: Vec<String>,
    /// Sorted by internal id, so the same live set always serializes
    /// identically regardless of registry hashing.
    pub documents: Vec<DocumentSnapshot<Id>>,
    /// field name -> internal doc id -> token length.
    pub lengths: BTreeMap<String, BTreeMap<u32, u32>>,
    #[serde(rename = "avgFieldLength")]
    pub avg_field_length: BTreeMap<String, f64>,
    /// term -> field name -> internal doc id -> occurrence count.
    pub index: BTreeMap<String, BTreeMap<String, BTreeMap<u32, u32>>>,
}

/// Build a [`Snapshot`] from live engine state. `field_names` must be in
/// the same declaration order used to assign `FieldId`s.
pub fn build_snapshot<Id>(
    field_names: &[String],
    stored_field_names: &[String],
    index: &InvertedIndex,
    registry: &Registry<Id>,
) -> Snapshot<Id>
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    let mut documents = Vec::new();
    let mut lengths: BTreeMap<String, BTreeMap<u32, u32>> = BTreeMap::new();
    for doc in registry.live_doc_ids() {
        let Some(external_id) = registry.external_id(doc).cloned() else {
            continue;
        };
        let mut fields = BTreeMap::new();
        for (i, name) in field_names.iter().enumerate() {
            let field = FieldId(i as u16);
            let len = registry.field_length(doc, field);
            if len == 0 && registry.stored_field(doc, field).is_none() {
                continue;
            }
            lengths.entry(name.clone()).or_default().insert(doc.0, len);
            let stored = registry.stored_field(doc, field).unwrap_or("").to_string();
            let terms = registry.field_terms(doc, field).cloned().unwrap_or_default();
            fields.insert(name.clone(), FieldSnapshot { stored, terms });
        }
        documents.push(DocumentSnapshot {
            internal_id: doc.0,
            external_id,
            fields,
        });
    }
    documents.sort_by_key(|d| d.internal_id);

    let mut avg_field_length = BTreeMap::new();
    for (i, name) in field_names.iter().enumerate() {
        avg_field_length.insert(name.clone(), registry.avg_field_len(FieldId(i as u16)));
    }

    let mut term_index: BTreeMap<String, BTreeMap<String, BTreeMap<u32, u32>>> = BTreeMap::new();
    for (term, postings) in index.tree().entries() {
        let mut by_field = BTreeMap::new();
        for (field, per_doc) in postings {
            let Some(name) = field_names.get(field.as_usize()) else {
                continue;
            };
            let counts: BTreeMap<u32, u32> = per_doc.iter().map(|(d, c)| (d.0, *c)).collect();
            by_field.insert(name.clone(), counts);
        }
        term_index.insert(term, by_field);
    }

    Snapshot {
        schema_version: SCHEMA_VERSION,
        fields: field_names.to_vec(),
        stored_fields: stored_field_names.to_vec(),
        documents,
        lengths,
        avg_field_length,
        index: term_index,
    }
}

/// Rebuild an inverted index and registry from a loaded [`Snapshot`].
/// Rejects a snapshot whose schema version or declared field list doesn't
/// match this build's configuration with [`Error::IncompatibleSnapshot`].
pub fn restore_snapshot<Id>(
    snapshot: Snapshot<Id>,
    expected_fields: &[String],
) -> Result<(InvertedIndex, Registry<Id>)>
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    if snapshot.schema_version != SCHEMA_VERSION {
        log::error!(
            "snapshot schema version {} does not match expected {}",
            snapshot.schema_version,
            SCHEMA_VERSION
        );
        return Err(Error::IncompatibleSnapshot(format!(
            "schema version {} != {}",
            snapshot.schema_version, SCHEMA_VERSION
        )));
    }
    if snapshot.fields != expected_fields {
        log::error!("snapshot field list {:?} does not match expected {:?}", snapshot.fields, expected_fields);
        return Err(Error::IncompatibleSnapshot(format!(
            "field list {:?} != {:?}",
            snapshot.fields, expected_fields
        )));
    }

    let field_index: BTreeMap<&str, FieldId> = snapshot
        .fields
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), FieldId(i as u16)))
        .collect();

    let mut index = InvertedIndex::new();
    for (term, by_field) in &snapshot.index {
        for (field_name, counts) in by_field {
            let Some(&field) = field_index.get(field_name.as_str()) else {
                continue;
            };
            for (&doc_raw, &count) in counts {
                let doc = DocId(doc_raw);
                for _ in 0..count {
                    index.add_occurrence(term, field, doc);
                }
            }
        }
    }

    let mut registry: Registry<Id> = Registry::new();
    // Reinstate each document at its original `internal_id`, not a freshly
    // re-minted dense one: the inverted index above was just rebuilt against
    // those exact `DocId`s, and `register`'s own from-zero assignment would
    // disagree with them as soon as a removal left a gap in the live ids.
    for doc_snap in snapshot.documents {
        let doc = DocId(doc_snap.internal_id);
        registry.register_at(doc, doc_snap.external_id)?;
        for (name, field_snap) in &doc_snap.fields {
            let Some(&field) = field_index.get(name.as_str()) else {
                continue;
            };
            registry.set_field(doc, field, &field_snap.stored, field_snap.terms.clone());
        }
    }

    Ok((index, registry))
}
