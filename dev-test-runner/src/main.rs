//! Render every fixture under a directory and check which sections survive.
//!
//! A fixture `foo.json` is paired with `foo.expect.json`:
//! `{"sections": [...], "ignored_keys": [...], "envelope": bool}`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use email_digest::{DocumentNode, Renderer, RendererConfig, envelope};
use serde_json::Value;

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures")));

    let pattern = format!("{}/*.json", dir.display());
    let mut failures = 0usize;
    let mut total = 0usize;
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.to_string_lossy().ends_with(".expect.json") {
            continue;
        }
        total += 1;
        match run_fixture(&path) {
            Ok(()) => eprintln!("{} {}", "✅ pass".green(), path.display()),
            Err(error) => {
                failures += 1;
                eprintln!("{} {}: {error:#}", "❌ fail".red(), path.display());
            }
        }
    }

    eprintln!("—— {} fixtures, {} failed ——", total, failures);
    if failures > 0 {
        return Err(anyhow!("{failures} fixture(s) failed"));
    }
    Ok(())
}

fn run_fixture(path: &Path) -> Result<()> {
    let expect = read_json(&path.with_extension("expect.json"))?;
    let input = read_json(path)?;

    let node = if expect.get("envelope").and_then(Value::as_bool).unwrap_or(false) {
        envelope::document_from_response(&input)?
    } else {
        DocumentNode::from(input)
    };

    let config = RendererConfig {
        ignored_keys: string_list(&expect, "ignored_keys"),
        ..RendererConfig::default()
    };
    let out = Renderer::new(config).render(&node);

    let expected = string_list(&expect, "sections");
    let actual: Vec<String> = out.breakdown.keys().cloned().collect();
    if actual != expected {
        return Err(anyhow!("sections {actual:?}, expected {expected:?}"));
    }
    if expected.is_empty() && !out.full_html.contains(&RendererConfig::default().no_data_message)
        && node.as_record().is_none()
    {
        return Err(anyhow!("non-record input did not produce the no-data placeholder"));
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("failed to parse {}", path.display()))
}

fn string_list(v: &Value, key: &str) -> Vec<String> {
    v.get(key)
        .and_then(Value::as_array)
        .map(|xs| xs.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}
