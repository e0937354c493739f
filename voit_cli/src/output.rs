use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use voit_lib::ResultRecord;

use crate::xml_output;

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
    Xml,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            "xml" => OutputFormat::Xml,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct RecordRow {
    #[tabled(rename = "Party")]
    #[serde(rename = "Party")]
    party: String,
    #[tabled(rename = "Ranking")]
    #[serde(rename = "Ranking")]
    ranking: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Votes")]
    #[serde(rename = "Votes")]
    votes: String,
}

// -- Row builders --

fn build_record_rows(records: &[ResultRecord]) -> Vec<RecordRow> {
    records
        .iter()
        .map(|r| RecordRow {
            party: r.party.clone(),
            ranking: value_text(&r.ranking),
            name: value_text(&r.name),
            votes: value_text(&r.votes),
        })
        .collect()
}

/// Strings without quotes, null as empty, anything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// -- Renderers --

pub fn records_table(records: &[ResultRecord]) -> String {
    Table::new(build_record_rows(records)).to_string()
}

pub fn records_markdown(records: &[ResultRecord]) -> String {
    let mut table = Table::new(build_record_rows(records));
    table.with(Style::markdown());
    table.to_string()
}

pub fn records_csv(records: &[ResultRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in build_record_rows(records) {
        wtr.serialize(row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV output: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn records_json(records: &[ResultRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Renders `records` in `format`, without a trailing newline guarantee.
pub fn render_records(records: &[ResultRecord], format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Table => records_table(records),
        OutputFormat::Markdown => records_markdown(records),
        OutputFormat::Csv => records_csv(records)?,
        OutputFormat::Json => records_json(records)?,
        OutputFormat::Xml => xml_output::records_to_xml(records)?,
    })
}

/// Writes rendered output to `path`, or to stdout when no path is given.
pub fn write_output(rendered: &str, path: Option<&Path>) -> Result<()> {
    let mut text = rendered.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("writing results to {}", path.display()))?,
        None => print!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
