use crate::translator::Translator;
use indicatif::ProgressBar;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// A query read from a batch file, with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRecord {
    pub line: usize,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub records: Vec<BatchRecord>,
    /// Set when `fail_fast` stopped the batch before the last query.
    pub stopped_early: bool,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.records.len() - self.failed()
    }
}

/// Split batch text into queries, skipping blank lines and `#` comments
pub fn parse_queries(text: &str) -> Vec<BatchQuery> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                None
            } else {
                Some(BatchQuery {
                    line: index + 1,
                    text: trimmed.to_string(),
                })
            }
        })
        .collect()
}

pub fn read_queries(path: &Path) -> io::Result<Vec<BatchQuery>> {
    Ok(parse_queries(&fs::read_to_string(path)?))
}

/// Translate every query independently. A failure is recorded against its
/// line; with `fail_fast` the batch stops at the first one.
pub fn translate_batch(
    translator: &Translator,
    queries: &[BatchQuery],
    fail_fast: bool,
    progress: &ProgressBar,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (index, query) in queries.iter().enumerate() {
        progress.set_message(format!("line {}", query.line));
        let record = match translator.translate(&query.text) {
            Ok(output) => BatchRecord {
                line: query.line,
                input: query.text.clone(),
                output: Some(output),
                error: None,
            },
            Err(e) => {
                warn!(line = query.line, "{}", e.to_string().lines().next().unwrap_or(""));
                BatchRecord {
                    line: query.line,
                    input: query.text.clone(),
                    output: None,
                    error: Some(e.to_string()),
                }
            }
        };
        let failed = record.error.is_some();
        report.records.push(record);
        progress.inc(1);

        if failed && fail_fast {
            report.stopped_early = index + 1 < queries.len();
            break;
        }
    }

    debug!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: &str = "# saved searches\n\n( action eq deny )\n  port.dst eq '22'  \n(time_generated geq '2023/01/01 00:00:00') or (time_generated geq '2023/01/02 00:00:00')\naddr eq 10.0.0.1\n";

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let queries = parse_queries(BATCH);
        let lines: Vec<usize> = queries.iter().map(|q| q.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6]);
        assert_eq!(queries[1].text, "port.dst eq '22'");
    }

    #[test]
    fn test_failures_do_not_stop_batch() {
        let queries = parse_queries(BATCH);
        let report = translate_batch(
            &Translator::default(),
            &queries,
            false,
            &ProgressBar::hidden(),
        );
        assert_eq!(report.records.len(), 4);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 3);
        assert!(!report.stopped_early);
        assert_eq!(report.records[0].output.as_deref(), Some("( DeviceAction == 'deny' )"));
        assert_eq!(report.records[2].line, 5);
        assert!(report.records[2].error.is_some());
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        let queries = parse_queries(BATCH);
        let report = translate_batch(
            &Translator::default(),
            &queries,
            true,
            &ProgressBar::hidden(),
        );
        assert_eq!(report.records.len(), 3);
        assert!(report.stopped_early);
    }
}
