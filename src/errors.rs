// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structural error kinds for the engine.
//!
//! Query-time failures never surface here - a malformed query string degrades
//! to an empty result set inside the evaluator. Everything in this enum is a
//! programming-level mistake the caller can act on: a duplicate id, a removal
//! of something that was never added, an inconsistent prefix-view extension,
//! or a snapshot that doesn't match this build's schema.

use std::fmt;

/// Errors that can be returned from the engine's structural operations.
///
/// Deliberately hand-rolled rather than built on a macro-derived error crate:
/// the variant set is small, stable, and each one already carries exactly the
/// context a caller needs to react (see `spec.md` §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `add` was called with an external id that is already live.
    DuplicateId(String),
    /// `remove` was called with an external id that isn't in the registry.
    UnknownDocument(String),
    /// A declared field was required but absent from a document.
    UnknownField(String),
    /// A `PrefixView` was extended with a prefix inconsistent with its
    /// pending unmatched suffix.
    InvalidPrefix,
    /// A snapshot's version tag or field schema does not match this engine.
    IncompatibleSnapshot(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateId(id) => write!(f, "document id '{id}' is already indexed"),
            Error::UnknownDocument(id) => write!(f, "no live document with id '{id}'"),
            Error::UnknownField(name) => write!(f, "field '{name}' is missing from the document"),
            Error::InvalidPrefix => {
                write!(f, "prefix extension is inconsistent with the view's pending suffix")
            }
            Error::IncompatibleSnapshot(reason) => {
                write!(f, "incompatible snapshot: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
