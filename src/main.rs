// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `minidex` command-line interface: build snapshots from JSON documents,
//! query them, autosuggest against them, and inspect their structure.

mod cli;

use std::collections::HashMap;
use std::fs;

use clap::Parser;
use serde::Deserialize;

use minidex::{Engine, EngineOptions, Snapshot};

use cli::{Cli, Commands};

#[derive(Debug, Deserialize)]
struct InputDocument {
    id: String,
    fields: HashMap<String, String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Index { input, config, output } => run_index(&input, &config, &output),
        Commands::Search { snapshot, query, limit } => run_search(&snapshot, &query, limit),
        Commands::Suggest { snapshot, input, limit } => run_suggest(&snapshot, &input, limit),
        Commands::Inspect { snapshot } => run_inspect(&snapshot),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_options(config_path: &str) -> Result<EngineOptions, String> {
    let raw = fs::read_to_string(config_path).map_err(|e| format!("reading config {config_path}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("parsing config {config_path}: {e}"))
}

fn load_documents(dir: &str) -> Result<Vec<InputDocument>, String> {
    let mut docs = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| format!("reading directory {dir}: {e}"))?;
    for entry in entries {
        let entry = entry.map_err(|e| format!("reading directory entry: {e}"))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let raw = fs::read_to_string(&path).map_err(|e| format!("reading {}: {e}", path.display()))?;
        let doc: InputDocument =
            serde_json::from_str(&raw).map_err(|e| format!("parsing {}: {e}", path.display()))?;
        docs.push(doc);
    }
    docs.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(docs)
}

fn run_index(input: &str, config: &str, output: &str) -> Result<(), String> {
    let options = load_options(config)?;
    let documents = load_documents(input)?;
    log::debug!("loaded {} documents from {input}", documents.len());

    let mut engine: Engine<String> = Engine::new(options);
    let total = documents.len();
    for (i, doc) in documents.into_iter().enumerate() {
        engine
            .add(doc.id.clone(), &doc.fields)
            .map_err(|e| format!("indexing document '{}': {e}", doc.id))?;
        if (i + 1) % 100 == 0 || i + 1 == total {
            eprintln!("indexed {}/{total}", i + 1);
        }
    }

    let snapshot = engine.snapshot();
    let json = serde_json::to_string(&snapshot).map_err(|e| format!("serializing snapshot: {e}"))?;
    fs::write(output, json).map_err(|e| format!("writing {output}: {e}"))?;
    eprintln!("wrote snapshot with {} documents to {output}", engine.document_count());
    Ok(())
}

fn load_snapshot(path: &str, config: Option<&str>) -> Result<Engine<String>, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
    let snapshot: Snapshot<String> =
        serde_json::from_str(&raw).map_err(|e| format!("parsing snapshot {path}: {e}"))?;
    let options = match config {
        Some(path) => load_options(path)?,
        None => EngineOptions {
            fields: snapshot.fields.iter().map(|name| minidex::FieldSpec::new(name.clone())).collect(),
            ..Default::default()
        },
    };
    Engine::restore(options, snapshot).map_err(|e| format!("restoring snapshot {path}: {e}"))
}

fn run_search(snapshot: &str, query: &str, limit: usize) -> Result<(), String> {
    let engine = load_snapshot(snapshot, None)?;
    let mut results = engine.search(query);
    results.truncate(limit);
    let rows: Vec<(String, f64)> = results.into_iter().map(|r| (r.id, r.score)).collect();
    cli::display::print_results(&rows);
    Ok(())
}

fn run_suggest(snapshot: &str, input: &str, limit: usize) -> Result<(), String> {
    let engine = load_snapshot(snapshot, None)?;
    let mut suggestions = engine.suggest(input);
    suggestions.truncate(limit);
    let rows: Vec<(String, f64)> = suggestions.into_iter().map(|s| (s.text, s.score)).collect();
    cli::display::print_suggestions(&rows);
    Ok(())
}

fn run_inspect(snapshot_path: &str) -> Result<(), String> {
    let raw = fs::read_to_string(snapshot_path).map_err(|e| format!("reading {snapshot_path}: {e}"))?;
    let snapshot: Snapshot<String> =
        serde_json::from_str(&raw).map_err(|e| format!("parsing snapshot {snapshot_path}: {e}"))?;
    cli::display::print_snapshot_stats(&snapshot.fields, snapshot.documents.len(), snapshot.index.len());
    Ok(())
}
