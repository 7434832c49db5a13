// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! An in-memory, single-process full-text search engine: a radix-tree term
//! dictionary backing exact, prefix, and fuzzy lookup; an inverted index
//! with BM25-style ranking; a small boolean query language; autosuggest;
//! and a versioned snapshot codec for persistence between process runs.
//!
//! This crate does not touch disk on its own, does not shard across
//! processes, and does no language-specific linguistic analysis beyond the
//! tokenizer/term-processor hooks a host can swap in. It indexes what you
//! hand it, in memory, for the lifetime of the `Engine`.
//!
//! ```
//! use std::collections::HashMap;
//! use minidex::{Engine, EngineOptions, FieldSpec};
//!
//! let mut engine: Engine<String> = Engine::new(EngineOptions {
//!     fields: vec![FieldSpec::new("title"), FieldSpec::new("body")],
//!     ..Default::default()
//! });
//!
//! let mut fields = HashMap::new();
//! fields.insert("title".to_string(), "Rust Programming".to_string());
//! fields.insert("body".to_string(), "A systems language".to_string());
//! engine.add("doc-1".to_string(), &fields).unwrap();
//!
//! let hits = engine.search("rust");
//! assert_eq!(hits[0].id, "doc-1");
//! ```

pub mod contracts;
pub mod engine;
pub mod errors;
pub mod inverted;
pub mod query;
pub mod radix;
pub mod registry;
pub mod scoring;
pub mod snapshot;
pub mod suggest;
pub mod tokenize;
pub mod types;

pub use engine::{BmOptions, Document, Engine, EngineOptions, FieldSpec, SearchOptions, SearchResult};
pub use errors::{Error, Result};
pub use query::Expr;
pub use snapshot::Snapshot;
pub use suggest::Suggestion;
pub use types::{DocId, FieldId};

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            fields: Vec::new(),
            bm: BmOptions::default(),
            fuzzy_distance: 1,
            prefix_expansion: true,
            max_suggest_combinations: 64,
        }
    }
}
