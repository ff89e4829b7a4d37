//! Parsing of `npm search` standard output.
//!
//! Output is tried against an ordered chain of parsers. Each stage may
//! decline, handing the text to the next one; when every stage declines the
//! result is an empty list rather than an error.

use scout_core::types::PackageRecord;
use tracing::debug;

use crate::api::CliSearchRecord;
use crate::normalize;

/// A parse stage: `None` means "not my format"
type ParseStage = fn(&str, usize) -> Option<Vec<PackageRecord>>;

const PARSE_CHAIN: [(&str, ParseStage); 2] = [("json", parse_json), ("text", parse_tab_text)];

/// Parse search output, keeping at most `limit` records
pub fn parse_search_output(stdout: &str, limit: usize) -> Vec<PackageRecord> {
    if stdout.trim().is_empty() {
        return Vec::new();
    }

    for (format, stage) in PARSE_CHAIN {
        if let Some(packages) = stage(stdout, limit) {
            debug!("Parsed {} packages from {} output", packages.len(), format);
            return packages;
        }
        debug!("npm output is not {}, trying next format", format);
    }

    debug!("Unrecognized npm search output, returning no packages");
    Vec::new()
}

/// Parse a JSON array of CLI records
pub fn parse_json(stdout: &str, limit: usize) -> Option<Vec<PackageRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(stdout).ok()?;

    Some(
        values
            .into_iter()
            .filter_map(|value| serde_json::from_value::<CliSearchRecord>(value).ok())
            .filter_map(normalize::from_cli_record)
            .take(limit)
            .collect(),
    )
}

/// Parse newline-separated, tab-delimited `name\tversion\tdescription` lines
pub fn parse_tab_text(stdout: &str, limit: usize) -> Option<Vec<PackageRecord>> {
    let packages: Vec<PackageRecord> = stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            normalize::from_text_fields(&fields)
        })
        .take(limit)
        .collect();

    if packages.is_empty() {
        None
    } else {
        Some(packages)
    }
}
