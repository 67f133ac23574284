//! Features command - print the model's column schema

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::schema::{FeatureKind, FEATURE_NAMES};

#[derive(Debug, Serialize)]
struct FeatureRow {
    index: usize,
    name: &'static str,
    kind: FeatureKind,
}

fn rows() -> Vec<FeatureRow> {
    FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(index, &name)| FeatureRow {
            index,
            name,
            kind: FeatureKind::of_index(index),
        })
        .collect()
}

pub fn run(format: &str) -> Result<()> {
    let rows = rows();
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", style("Feature schema (model input order)").bold());
    println!("{}", style("──────────────────────────────────────").dim());
    for row in &rows {
        println!(
            "{:>3}  {:<36} {}",
            row.index,
            row.name,
            style(row.kind).dim()
        );
    }
    println!("\n{} features", rows.len());
    Ok(())
}
