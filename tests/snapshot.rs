// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Snapshot persistence end to end: writing a snapshot to disk, reloading
//! it into a fresh `Engine`, and confirming the rebuilt engine answers
//! queries identically to the original (`spec.md` §4.7, §6).

use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

use minidex::{Engine, EngineOptions, FieldSpec, Snapshot};

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn options() -> EngineOptions {
    EngineOptions {
        fields: vec![FieldSpec::new("title").with_boost(2.0), FieldSpec::new("body")],
        ..Default::default()
    }
}

fn seeded_engine() -> Engine<String> {
    let mut engine: Engine<String> = Engine::new(options());
    engine
        .add(
            "rust-guide".to_string(),
            &fields(&[("title", "The Rust Programming Language"), ("body", "ownership and borrowing")]),
        )
        .unwrap();
    engine
        .add(
            "python-guide".to_string(),
            &fields(&[("title", "Python for Data Science"), ("body", "dynamic typing")]),
        )
        .unwrap();
    engine
}

#[test]
fn snapshot_written_to_disk_reloads_into_an_equivalent_engine() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.json");

    let engine = seeded_engine();
    let json = serde_json::to_string_pretty(&engine.snapshot()).unwrap();
    fs::write(&path, &json).unwrap();

    let loaded = fs::read_to_string(&path).unwrap();
    let snapshot: Snapshot<String> = serde_json::from_str(&loaded).unwrap();
    let restored: Engine<String> = Engine::restore(options(), snapshot).unwrap();

    assert_eq!(restored.document_count(), engine.document_count());
    let original_hits = engine.search("programming");
    let restored_hits = restored.search("programming");
    assert_eq!(
        original_hits.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
        restored_hits.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
    );
}

#[test]
fn snapshot_file_is_byte_identical_across_writes_of_the_same_state() {
    let temp_dir = TempDir::new().unwrap();
    let path_a = temp_dir.path().join("a.json");
    let path_b = temp_dir.path().join("b.json");

    let engine = seeded_engine();
    fs::write(&path_a, serde_json::to_string(&engine.snapshot()).unwrap()).unwrap();
    fs::write(&path_b, serde_json::to_string(&engine.snapshot()).unwrap()).unwrap();

    let a = fs::read(&path_a).unwrap();
    let b = fs::read(&path_b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn restoring_with_a_different_field_declaration_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.json");

    let engine = seeded_engine();
    fs::write(&path, serde_json::to_string(&engine.snapshot()).unwrap()).unwrap();

    let loaded = fs::read_to_string(&path).unwrap();
    let snapshot: Snapshot<String> = serde_json::from_str(&loaded).unwrap();
    let mismatched = EngineOptions {
        fields: vec![FieldSpec::new("title")],
        ..Default::default()
    };
    assert!(Engine::restore(mismatched, snapshot).is_err());
}

#[test]
fn restoring_a_removed_document_stays_removed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.json");

    let mut engine = seeded_engine();
    engine.remove(&"python-guide".to_string()).unwrap();
    fs::write(&path, serde_json::to_string(&engine.snapshot()).unwrap()).unwrap();

    let loaded = fs::read_to_string(&path).unwrap();
    let snapshot: Snapshot<String> = serde_json::from_str(&loaded).unwrap();
    let restored: Engine<String> = Engine::restore(options(), snapshot).unwrap();

    assert_eq!(restored.document_count(), 1);
    assert!(!restored.contains(&"python-guide".to_string()));
}

#[test]
fn restoring_after_removing_an_earlier_document_keeps_the_survivor_searchable() {
    // "rust-guide" gets internal id 0, "python-guide" gets id 1; removing
    // "rust-guide" leaves a gap at 0 so "python-guide" stays at its
    // original id 1 rather than being the lowest live id.
    let mut engine = seeded_engine();
    engine.remove(&"rust-guide".to_string()).unwrap();

    let before = engine.search("python");
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].id, "python-guide");

    let json = serde_json::to_string(&engine.snapshot()).unwrap();
    let snapshot: Snapshot<String> = serde_json::from_str(&json).unwrap();
    let restored: Engine<String> = Engine::restore(options(), snapshot).unwrap();

    assert_eq!(restored.document_count(), 1);
    let after = restored.search("python");
    assert_eq!(
        after.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
        before.iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
    );
}
