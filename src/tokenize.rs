// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer and term-processor pipeline (`spec.md` §2, §9).
//!
//! Splitting text into tokens and normalizing each token into a term are
//! deliberately two separate, swappable stages: a host that wants CJK
//! segmentation only needs to replace the tokenizer, while a host that
//! wants a stemmer only needs to replace the term processor. Neither stage
//! does linguistic analysis by default — that's a non-goal — but the hooks
//! are real trait objects, not TODO comments.

/// Splits a field's text into raw tokens, in order of occurrence.
///
/// The default implementation below splits on Unicode whitespace and strips
/// leading/trailing punctuation from each piece, which is enough to index
/// prose without pulling in a segmentation crate.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Normalizes a single raw token into an indexable term (lowercasing,
/// diacritic stripping, stemming, ...). Returning `None` drops the token
/// (e.g. stop-word filtering), though no default processor does this.
pub trait TermProcessor: Send + Sync {
    fn process(&self, token: &str) -> Option<String>;
}

/// Whitespace-and-punctuation tokenizer. Treats anything that is not
/// alphanumeric as a separator, which keeps contractions and hyphenated
/// words from merging into their neighbors without requiring a full
/// Unicode word-break table.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTokenizer;

impl Tokenizer for DefaultTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Lowercases and, when the `unicode-normalization` feature is enabled,
/// strips combining diacritics via NFD decomposition so `"café"` and
/// `"cafe"` index to the same term.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTermProcessor;

impl TermProcessor for DefaultTermProcessor {
    fn process(&self, token: &str) -> Option<String> {
        if token.is_empty() {
            return None;
        }
        let lowered = token.to_lowercase();
        Some(strip_diacritics(&lowered))
    }
}

#[cfg(feature = "unicode-normalization")]
fn strip_diacritics(s: &str) -> String {
    use unicode_normalization::char::is_combining_mark;
    use unicode_normalization::UnicodeNormalization;
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(not(feature = "unicode-normalization"))]
fn strip_diacritics(s: &str) -> String {
    s.to_string()
}

/// An optional, concrete example of the `TermProcessor` hook `spec.md` §9
/// calls for: a Snowball stemmer wrapping [`rust_stemmers`], feature-gated
/// behind `stemmer` since stemming is explicitly a host-supplied concern
/// (`spec.md` §1's "Out of scope"), never the engine default.
#[cfg(feature = "stemmer")]
#[derive(Debug)]
pub struct SnowballTermProcessor {
    stemmer: rust_stemmers::Stemmer,
}

#[cfg(feature = "stemmer")]
impl SnowballTermProcessor {
    pub fn new(algorithm: rust_stemmers::Algorithm) -> Self {
        SnowballTermProcessor { stemmer: rust_stemmers::Stemmer::create(algorithm) }
    }
}

#[cfg(feature = "stemmer")]
impl TermProcessor for SnowballTermProcessor {
    fn process(&self, token: &str) -> Option<String> {
        if token.is_empty() {
            return None;
        }
        let lowered = token.to_lowercase();
        let normalized = strip_diacritics(&lowered);
        Some(self.stemmer.stem(&normalized).into_owned())
    }
}

/// Tokenize then process in one pass, dropping tokens the processor
/// rejects. This is the single entry point `registry`/`inverted` use so
/// indexing and query-time expansion always agree on what a "term" is.
pub fn terms_of(tokenizer: &dyn Tokenizer, processor: &dyn TermProcessor, text: &str) -> Vec<String> {
    tokenizer
        .tokenize(text)
        .into_iter()
        .filter_map(|tok| processor.process(tok))
        .collect()
}
