use crate::batch::BatchReport;
use crate::translator::{MappingTable, StageStep, Translation};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use similar::{ChangeTag, TextDiff};
use std::fmt::Write as _;

/// Character-level colored diff of one stage's rewrite
pub fn compute_stage_diff(step: &StageStep) -> String {
    let diff = TextDiff::from_chars(step.before.as_str(), step.after.as_str());
    let mut result = String::new();

    for change in diff.iter_all_changes() {
        let text = change.value();
        match change.tag() {
            ChangeTag::Delete => {
                let _ = write!(result, "{}", text.red().strikethrough());
            }
            ChangeTag::Insert => {
                let _ = write!(result, "{}", text.green());
            }
            ChangeTag::Equal => result.push_str(text),
        }
    }

    result
}

/// Render a translation for the terminal
pub fn format_translation_text(
    translation: &Translation,
    copied: bool,
    explain: bool,
    quiet: bool,
) -> String {
    if quiet {
        return format!("{}\n", translation.output);
    }

    let mut out = String::new();

    if explain {
        let _ = writeln!(out, "{}", "Pipeline:".bold().bright_blue());
        for step in &translation.steps {
            if step.changed() {
                let _ = writeln!(
                    out,
                    "  {:<20} {}",
                    step.stage.name().yellow(),
                    compute_stage_diff(step)
                );
            } else {
                let _ = writeln!(
                    out,
                    "  {:<20} {}",
                    step.stage.name().dimmed(),
                    "(unchanged)".dimmed()
                );
            }
        }
    }

    let header = if copied {
        "Translation (copied to clipboard):"
    } else {
        "Translation:"
    };
    let _ = writeln!(out, "\n{}", header.green().bold());
    let _ = writeln!(out, "  {}", translation.output);
    out
}

/// Table of mapping rules; whitespace around tokens is made visible by quoting
pub fn format_mappings_table(table: &MappingTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "PAN", "KQL"]);

    for (index, rule) in table.rules().iter().enumerate() {
        out.add_row(vec![
            Cell::new(index + 1),
            Cell::new(format!("{:?}", rule.source)),
            Cell::new(format!("{:?}", rule.target)),
        ]);
    }

    out
}

/// One translated query per line. Failed lines become `#` comments so the
/// output can be fed back to `batch`.
pub fn format_batch_text(report: &BatchReport) -> String {
    let mut out = String::new();

    for record in &report.records {
        match (&record.output, &record.error) {
            (Some(output), _) => {
                let _ = writeln!(out, "{output}");
            }
            (None, Some(error)) => {
                let first_line = error.lines().next().unwrap_or_default();
                let _ = writeln!(out, "# line {}: {}", record.line, first_line);
            }
            (None, None) => {}
        }
    }

    out
}

/// Human summary of a batch run, written to stderr
pub fn format_batch_summary(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{} translated, {} failed",
        report.succeeded().to_string().green().bold(),
        if report.failed() > 0 {
            report.failed().to_string().red().bold()
        } else {
            report.failed().to_string().normal()
        }
    );
    if report.stopped_early {
        let _ = write!(out, " {}", "(stopped at first failure)".yellow());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchRecord;
    use crate::translator::Translator;

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_quiet_prints_only_output() {
        no_color();
        let translation = Translator::default().explain("rule eq web").unwrap();
        assert_eq!(format_translation_text(&translation, true, true, true), "Rule == web\n");
    }

    #[test]
    fn test_header_reflects_clipboard() {
        no_color();
        let translation = Translator::default().explain("rule eq web").unwrap();
        let copied = format_translation_text(&translation, true, false, false);
        assert!(copied.contains("Translation (copied to clipboard):"));
        let not_copied = format_translation_text(&translation, false, false, false);
        assert!(not_copied.contains("Translation:\n  Rule == web"));
    }

    #[test]
    fn test_explain_lists_all_stages() {
        no_color();
        let translation = Translator::default().explain("port.dst eq '443'").unwrap();
        let text = format_translation_text(&translation, false, true, false);
        for step in &translation.steps {
            assert!(text.contains(step.stage.name()));
        }
        assert!(text.contains("(unchanged)"));
    }

    #[test]
    fn test_stage_diff_keeps_unchanged_context() {
        no_color();
        let step = StageStep {
            stage: crate::translator::Stage::FieldMapping,
            before: "a eq b".to_string(),
            after: "a == b".to_string(),
        };
        let diff = compute_stage_diff(&step);
        assert!(diff.starts_with("a "));
        assert!(diff.ends_with(" b"));
    }

    #[test]
    fn test_mappings_table_has_row_per_rule() {
        let table = format_mappings_table(&MappingTable::default());
        assert_eq!(table.row_iter().count(), 20);
        assert!(table.to_string().contains("addr.src"));
    }

    #[test]
    fn test_batch_text_comments_failures() {
        let report = BatchReport {
            records: vec![
                BatchRecord {
                    line: 1,
                    input: "rule eq web".to_string(),
                    output: Some("Rule == web".to_string()),
                    error: None,
                },
                BatchRecord {
                    line: 2,
                    input: "time_generated eq x".to_string(),
                    output: None,
                    error: Some("Incorrect PAN time format\n\nMust use".to_string()),
                },
            ],
            stopped_early: false,
        };
        assert_eq!(
            format_batch_text(&report),
            "Rule == web\n# line 2: Incorrect PAN time format\n"
        );
    }
}
