// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display helpers for the minidex CLI.
//!
//! Deliberately modest next to a browser-facing tool's theming: plain
//! tabular output, colored only when stdout is a TTY and `NO_COLOR` isn't
//! set, since this binary's output is as often piped into `jq`/`less` as
//! read directly.

use std::io::IsTerminal;

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn bold(s: &str) -> String {
    if color_enabled() {
        format!("\x1b[1m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

fn dim(s: &str) -> String {
    if color_enabled() {
        format!("\x1b[2m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

/// Print a ranked list of `(id, score)` results as a simple table.
pub fn print_results(results: &[(String, f64)]) {
    if results.is_empty() {
        println!("{}", dim("(no results)"));
        return;
    }
    println!("{:>4}  {:<10}  {}", bold("#"), bold("score"), bold("id"));
    for (i, (id, score)) in results.iter().enumerate() {
        println!("{:>4}  {:<10.4}  {}", i + 1, score, id);
    }
}

/// Print ranked autosuggest completions.
pub fn print_suggestions(suggestions: &[(String, f64)]) {
    if suggestions.is_empty() {
        println!("{}", dim("(no suggestions)"));
        return;
    }
    for (text, score) in suggestions {
        println!("{:<30} {}", text, dim(&format!("{score:.4}")));
    }
}

/// Print summary stats about a loaded snapshot.
pub fn print_snapshot_stats(field_names: &[String], document_count: usize, term_count: usize) {
    println!("{}", bold("snapshot"));
    println!("  fields:    {}", field_names.join(", "));
    println!("  documents: {document_count}");
    println!("  terms:     {term_count}");
}
