// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The public-facing `Engine<Id>`: ties the radix tree, inverted index,
//! document registry, scorer, query evaluator, autosuggest, and snapshot
//! codec into the single object a host embeds (`spec.md` §2, §6).

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::contracts;
use crate::errors::{Error, Result};
use crate::inverted::InvertedIndex;
use crate::query::eval::EvalOptions;
use crate::query::{self, Expr};
use crate::registry::Registry;
use crate::scoring::{BmParams, FieldBoosts};
use crate::snapshot::{self, Snapshot};
use crate::suggest::{self, SuggestOptions, Suggestion};
use crate::tokenize::{DefaultTermProcessor, DefaultTokenizer, TermProcessor, Tokenizer};
use crate::types::{DocId, FieldId};

/// Declares one indexable field: its name, relative scoring weight, and
/// whether its raw value is retrievable from a search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default = "default_boost")]
    pub boost: f64,
    #[serde(default)]
    pub stored: bool,
}

fn default_boost() -> f64 {
    1.0
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        FieldSpec {
            name: name.into(),
            boost: 1.0,
            stored: true,
        }
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn unstored(mut self) -> Self {
        self.stored = false;
        self
    }
}

/// Library-level configuration surface. Constructed directly by an embedder
/// or loaded by the CLI from a small JSON/TOML config file via `serde`
/// (`spec.md` §6, expanded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOptions {
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub bm: BmOptions,
    #[serde(default = "default_fuzzy_distance")]
    pub fuzzy_distance: usize,
    #[serde(default = "default_true")]
    pub prefix_expansion: bool,
    #[serde(default = "default_max_combinations")]
    pub max_suggest_combinations: usize,
}

fn default_fuzzy_distance() -> usize {
    1
}
fn default_true() -> bool {
    true
}
fn default_max_combinations() -> usize {
    64
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BmOptions {
    pub k1: f64,
    pub b: f64,
}

impl Default for BmOptions {
    fn default() -> Self {
        let p = BmParams::default();
        BmOptions { k1: p.k1, b: p.b }
    }
}

/// One document to index: an external id plus raw text per declared field.
#[derive(Debug, Clone)]
pub struct Document<Id> {
    pub id: Id,
    pub fields: HashMap<String, String>,
}

/// Per-call search knobs layered on top of the engine's construction-time
/// defaults (`spec.md` §6's search-options list). Currently carries only
/// `filter`; `combineWith`, per-call `boost`, per-call `prefix`/`fuzzy`, and
/// a per-call field subset are construction-time-only in this engine (see
/// DESIGN.md).
pub struct SearchOptions<'a, Id> {
    /// Applied after scoring and before ordering (`spec.md` §4.5): a
    /// document surviving the query evaluation is dropped from the result
    /// set unless this predicate returns `true` for it. `None` keeps every
    /// scored document.
    pub filter: Option<&'a dyn Fn(&SearchResult<Id>) -> bool>,
}

impl<'a, Id> Default for SearchOptions<'a, Id> {
    fn default() -> Self {
        SearchOptions { filter: None }
    }
}

/// A single ranked hit (`spec.md` §6: `{id, score, match, ...stored}`).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<Id> {
    pub id: Id,
    pub score: f64,
    /// Matched dictionary term -> field names it occurred in, for this
    /// document.
    pub matches: HashMap<String, Vec<String>>,
    /// Stored field values for this document, keyed by field name — only
    /// fields declared `stored` are present.
    pub stored: HashMap<String, String>,
}

/// The in-memory full-text search engine. Generic over the host's own
/// document identifier type.
pub struct Engine<Id> {
    options: EngineOptions,
    field_order: Vec<String>,
    field_ids: HashMap<String, FieldId>,
    boosts: FieldBoosts,
    tokenizer: Box<dyn Tokenizer>,
    processor: Box<dyn TermProcessor>,
    index: InvertedIndex,
    registry: Registry<Id>,
}

impl<Id> Engine<Id>
where
    Id: Eq + Hash + Clone + Ord + Debug + Serialize + DeserializeOwned,
{
    pub fn new(options: EngineOptions) -> Self {
        Self::with_pipeline(options, Box::new(DefaultTokenizer), Box::new(DefaultTermProcessor))
    }

    /// Construct with a custom tokenizer/term-processor pipeline — the hook
    /// `spec.md` §9 calls for, for hosts that want stemming, stop-word
    /// filtering, or CJK segmentation.
    pub fn with_pipeline(
        options: EngineOptions,
        tokenizer: Box<dyn Tokenizer>,
        processor: Box<dyn TermProcessor>,
    ) -> Self {
        let mut field_ids = HashMap::new();
        let mut boosts = FieldBoosts::new();
        let mut field_order = Vec::new();
        for (i, spec) in options.fields.iter().enumerate() {
            let id = FieldId(i as u16);
            field_ids.insert(spec.name.clone(), id);
            boosts.set(id, spec.boost);
            field_order.push(spec.name.clone());
        }
        log::debug!("engine constructed with {} declared fields", field_order.len());
        Engine {
            options,
            field_order,
            field_ids,
            boosts,
            tokenizer,
            processor,
            index: InvertedIndex::new(),
            registry: Registry::new(),
        }
    }

    fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            bm: BmParams { k1: self.options.bm.k1, b: self.options.bm.b },
            boosts: self.boosts.clone(),
            fuzzy_distance: self.options.fuzzy_distance,
            prefix_expansion: self.options.prefix_expansion,
        }
    }

    /// Index one document. Returns `Error::DuplicateId` if `id` is already
    /// live, or `Error::UnknownField` if `fields` is missing a declared
    /// field.
    pub fn add(&mut self, id: Id, fields: &HashMap<String, String>) -> Result<()> {
        for spec in &self.options.fields {
            if !fields.contains_key(&spec.name) {
                return Err(Error::UnknownField(spec.name.clone()));
            }
        }
        let doc = self.registry.register(id)?;
        for spec in &self.options.fields {
            let field_id = self.field_ids[&spec.name];
            let raw = &fields[&spec.name];
            let terms = crate::tokenize::terms_of(self.tokenizer.as_ref(), self.processor.as_ref(), raw);
            for term in &terms {
                self.index.add_occurrence(term, field_id, doc);
            }
            let stored = if spec.stored { raw.as_str() } else { "" };
            self.registry.set_field(doc, field_id, stored, terms);
        }
        self.debug_check_invariants();
        Ok(())
    }

    /// Index many documents sequentially. Stops and returns the first error
    /// encountered, leaving previously added documents live.
    pub fn add_all(&mut self, docs: Vec<Document<Id>>) -> Result<()> {
        for doc in docs {
            self.add(doc.id, &doc.fields)?;
        }
        Ok(())
    }

    /// As [`Engine::add_all`], but yields to the async runtime between
    /// chunks so a large batch doesn't monopolize a cooperative executor
    /// (`spec.md` §5). Gated behind the `async` feature.
    #[cfg(feature = "async")]
    pub async fn add_all_async(
        &mut self,
        docs: Vec<Document<Id>>,
        chunk_size: usize,
        should_cancel: impl Fn() -> bool,
    ) -> Result<()> {
        let chunk_size = chunk_size.max(1);
        for chunk in docs.chunks(chunk_size.min(docs.len().max(1))).collect::<Vec<_>>() {
            if should_cancel() {
                log::debug!("add_all_async cancelled before chunk completed");
                break;
            }
            for doc in chunk {
                self.add(doc.id.clone(), &doc.fields)?;
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Remove a live document. Returns `Error::UnknownDocument` if `id`
    /// isn't live.
    pub fn remove(&mut self, id: &Id) -> Result<()> {
        let (doc, field_terms) = self.registry.unregister(id)?;
        for (field, terms) in field_terms {
            for term in terms {
                self.index.remove_occurrences(&term, field, doc);
            }
        }
        self.debug_check_invariants();
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.registry.document_count()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.registry.contains(id)
    }

    /// Parse and evaluate a boolean query, returning hits ranked by
    /// descending score. A malformed query yields an empty result set
    /// (`spec.md` §7).
    pub fn search(&self, query: &str) -> Vec<SearchResult<Id>> {
        self.search_with(query, &SearchOptions::default())
    }

    /// As [`Engine::search`], with per-call options layered on top of the
    /// engine's construction-time defaults.
    pub fn search_with(&self, query: &str, opts: &SearchOptions<Id>) -> Vec<SearchResult<Id>> {
        let Some(expr) = query::parse(query) else {
            log::debug!("query '{query}' failed to parse; returning empty result set");
            return Vec::new();
        };
        self.search_expr_with(&expr, opts)
    }

    pub fn search_expr(&self, expr: &Expr) -> Vec<SearchResult<Id>> {
        self.search_expr_with(expr, &SearchOptions::default())
    }

    pub fn search_expr_with(&self, expr: &Expr, opts: &SearchOptions<Id>) -> Vec<SearchResult<Id>> {
        let scores = query::evaluate(expr, &self.index, &self.registry, &self.field_order, &self.eval_options());
        let mut results: Vec<SearchResult<Id>> = scores
            .into_iter()
            .filter_map(|(doc, (score, matches))| {
                self.registry.external_id(doc).cloned().map(|id| SearchResult {
                    id,
                    score,
                    matches,
                    stored: self.stored_fields_of(doc),
                })
            })
            .collect();
        // `spec.md` §4.5: filter runs after scoring, before ordering.
        if let Some(filter) = opts.filter {
            results.retain(filter);
        }
        // `spec.md` §8: sorted by score descending, ties broken by external
        // id lexicographic (i.e. `Ord`) order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results
    }

    fn stored_fields_of(&self, doc: DocId) -> HashMap<String, String> {
        let mut out = HashMap::new();
        for spec in &self.options.fields {
            if !spec.stored {
                continue;
            }
            let field = self.field_ids[&spec.name];
            if let Some(value) = self.registry.stored_field(doc, field) {
                out.insert(spec.name.clone(), value.to_string());
            }
        }
        out
    }

    /// Ranked completion suggestions for a partial, space-separated query
    /// (`spec.md` §4.6).
    pub fn suggest(&self, input: &str) -> Vec<Suggestion> {
        let opts = SuggestOptions {
            eval: self.eval_options(),
            max_combinations: self.options.max_suggest_combinations,
            limit: 10,
        };
        suggest::suggest(input, &self.index, &self.registry, self.tokenizer.as_ref(), self.processor.as_ref(), &opts)
    }

    /// Retrieve a stored field's raw value for a live document, if the
    /// field was declared `stored` and the document id is live.
    pub fn stored_field(&self, id: &Id, field_name: &str) -> Option<&str> {
        let doc = self.registry.internal_id(id)?;
        let field = *self.field_ids.get(field_name)?;
        self.registry.stored_field(doc, field)
    }

    pub fn snapshot(&self) -> Snapshot<Id> {
        let stored_names: Vec<String> = self
            .options
            .fields
            .iter()
            .filter(|f| f.stored)
            .map(|f| f.name.clone())
            .collect();
        snapshot::build_snapshot(&self.field_order, &stored_names, &self.index, &self.registry)
    }

    /// Rebuild an engine from a previously captured snapshot, using
    /// `options` for scoring/query configuration (field declarations must
    /// match the snapshot's, or `Error::IncompatibleSnapshot` is returned).
    pub fn restore(options: EngineOptions, snapshot: Snapshot<Id>) -> Result<Self> {
        let field_order: Vec<String> = options.fields.iter().map(|f| f.name.clone()).collect();
        let (index, registry) = snapshot::restore_snapshot(snapshot, &field_order)?;
        let mut engine = Self::new(options);
        engine.index = index;
        engine.registry = registry;
        Ok(engine)
    }

    fn debug_check_invariants(&self) {
        if cfg!(debug_assertions) {
            contracts::check_no_empty_postings(&self.index);
            contracts::check_doc_freq_bounded(&self.index, &self.registry);
            contracts::check_ids_within_bounds(&self.registry, self.registry.ids_ever_issued());
            contracts::check_postings_reference_live_docs(&self.index, &self.registry);
            for field in self.field_ids.values() {
                contracts::check_avg_len_non_negative(&self.registry, *field);
            }
        }
    }
}
