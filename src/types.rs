// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks shared across the engine.
//!
//! `DocId` and `FieldId` are newtypes over small integers so that passing a
//! character offset or a loop counter where a document id is expected is a
//! compile error rather than a 3am bug. Everything here is `Copy` and cheap.

use serde::{Deserialize, Serialize};

/// Dense, monotonically assigned internal document identifier.
///
/// Stable only within a snapshot epoch (`spec.md` §3, invariant I3): ids
/// freed by `remove` are never reused before the next snapshot reload or
/// compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

/// Identifier for a declared field, assigned in declaration order at
/// construction time (`spec.md` §3: "typically <16" fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct FieldId(pub u16);

impl FieldId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for FieldId {
    fn from(id: u16) -> Self {
        FieldId(id)
    }
}
