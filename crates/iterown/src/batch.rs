//! Batch resolution of JSON-lines query records
//!
//! Each non-blank input line is one call site:
//!
//! ```json
//! {"site": "src/main.rs:12", "container": "growable", "element": "duplicable", "form": "owning_iterator", "mutable": true}
//! ```
//!
//! `site` is optional and `mutable` defaults to `false`, matching a plain
//! `let` binding. Lines are resolved independently; a rejected or malformed
//! line is recorded and the batch continues.

use crate::config::ResolverConfig;
use crate::error::{IterResult, ParseError};
use crate::fact::{make_query, ContainerKind, ElementCapability, IterationForm, Query};
use crate::outcome::{Outcome, OwnershipMode};
use crate::resolve::Resolver;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub container: ContainerKind,
    pub element: ElementCapability,
    pub form: IterationForm,
    #[serde(default)]
    pub mutable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Resolved { query: Query, outcome: Outcome },
    Invalid { message: String },
    Malformed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    /// 1-based input line
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(flatten)]
    pub status: EntryStatus,
}

impl BatchEntry {
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.status {
            EntryStatus::Resolved { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub resolved: usize,
    pub invalid: usize,
    pub malformed: usize,
    /// Lines whose outcome is a move, reported when moves are denied
    pub findings: Vec<usize>,
}

impl BatchReport {
    /// True when no line was invalid, malformed or flagged
    pub fn is_clean(&self) -> bool {
        self.invalid == 0 && self.malformed == 0 && self.findings.is_empty()
    }

    fn push(&mut self, entry: BatchEntry) {
        match &entry.status {
            EntryStatus::Resolved { .. } => self.resolved += 1,
            EntryStatus::Invalid { .. } => self.invalid += 1,
            EntryStatus::Malformed { .. } => self.malformed += 1,
        }
        self.entries.push(entry);
    }
}

/// Batch runner bound to a configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct Batch {
    resolver: Resolver,
    deny_moves: bool,
}

impl Batch {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            resolver: config.resolver(),
            deny_moves: config.deny_moves,
        }
    }

    pub fn run_file(&self, path: &Path) -> IterResult<BatchReport> {
        let file = File::open(path)?;
        let report = self.run_reader(BufReader::new(file))?;
        info!(
            "{}: {} resolved, {} invalid, {} malformed",
            path.display(),
            report.resolved,
            report.invalid,
            report.malformed
        );
        Ok(report)
    }

    /// Resolve every line of `reader`
    ///
    /// Lines are read as raw bytes; a line that is not UTF-8 is recorded as
    /// malformed and the batch continues. Only a failing read is an error.
    pub fn run_reader<R: BufRead>(&self, mut reader: R) -> IterResult<BatchReport> {
        let mut report = BatchReport::default();
        let mut buf = Vec::new();
        let mut line = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line += 1;
            let bytes = trim_line_ending(&buf);
            let entry = match std::str::from_utf8(bytes) {
                Ok(text) => self.run_line(line, text),
                Err(e) => Some(malformed(line, format!("invalid UTF-8: {e}"))),
            };
            if let Some(entry) = entry {
                self.record(&mut report, entry);
            }
        }
        Ok(report)
    }

    pub fn run_str(&self, input: &str) -> IterResult<BatchReport> {
        self.run_reader(input.as_bytes())
    }

    fn record(&self, report: &mut BatchReport, entry: BatchEntry) {
        if self.deny_moves
            && entry
                .outcome()
                .is_some_and(|o| o.ownership_mode == OwnershipMode::Move)
        {
            report.findings.push(entry.line);
        }
        report.push(entry);
    }

    fn run_line(&self, line: usize, text: &str) -> Option<BatchEntry> {
        if text.trim().is_empty() {
            return None;
        }

        let record: QueryRecord = match serde_json::from_str(text) {
            Ok(record) => record,
            Err(e) => return Some(malformed(line, e.to_string())),
        };

        let status = match make_query(record.container, record.element, record.form, record.mutable)
        {
            Ok(query) => EntryStatus::Resolved {
                outcome: self.resolver.resolve(&query),
                query,
            },
            Err(err) => {
                debug!("line {}: {}", line, err);
                EntryStatus::Invalid {
                    message: err.to_string(),
                }
            }
        };

        Some(BatchEntry {
            line,
            site: record.site,
            status,
        })
    }
}

fn trim_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

fn malformed(line: usize, message: String) -> BatchEntry {
    let err = ParseError::MalformedRecord { line, message };
    debug!("{}", err);
    BatchEntry {
        line,
        site: None,
        status: EntryStatus::Malformed {
            message: err.to_string(),
        },
    }
}
