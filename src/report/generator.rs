//! Markdown and JSON report generation.
//!
//! This module renders a completed analysis snapshot for people (Markdown)
//! or for downstream tooling (JSON).

use crate::models::{AnalysisSnapshot, ChartSlice, KeywordHit, ProminenceEntry, RankedTerm};
use anyhow::Result;
use serde::Serialize;

/// Width in characters of the text bars drawn for chart slices.
const BAR_WIDTH: usize = 20;

/// A snapshot plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    /// Name of the classification gateway (its endpoint for HTTP).
    pub service: &'a str,
    #[serde(flatten)]
    pub snapshot: &'a AnalysisSnapshot,
}

impl<'a> Report<'a> {
    pub fn new(service: &'a str, snapshot: &'a AnalysisSnapshot) -> Self {
        Self { service, snapshot }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report<'_>) -> String {
    let snapshot = report.snapshot;
    let mut output = String::new();

    output.push_str("# ClaimLens Report\n\n");
    output.push_str(&generate_verdict_section(snapshot));
    output.push_str(&generate_chart_section(&snapshot.chart));
    output.push_str("## Prominent Terms\n\n");
    output.push_str(&format!("*Source: {}*\n\n", snapshot.term_origin));
    output.push_str(&generate_terms_table(
        &snapshot.result.top_terms,
        &snapshot.prominence,
    ));
    if !snapshot.keyword_hits.is_empty() {
        output.push_str("## Watch-list Hits\n\n");
        output.push_str(&generate_keyword_table(&snapshot.keyword_hits));
    }
    output.push_str(&generate_metadata_section(report));
    output.push_str(&generate_footer());

    output
}

/// Generate the verdict section.
fn generate_verdict_section(snapshot: &AnalysisSnapshot) -> String {
    let result = &snapshot.result;
    let mut section = String::new();

    section.push_str("## Verdict\n\n");
    section.push_str(&format!(
        "- **Label:** {} {}\n",
        result.label.emoji(),
        result.label.headline()
    ));
    section.push_str(&format!("- **Confidence:** {}%\n\n", result.probability));

    section
}

/// Generate the confidence breakdown with a text bar per slice.
fn generate_chart_section(chart: &[ChartSlice]) -> String {
    let mut section = String::new();

    section.push_str("## Prediction Confidence\n\n");
    section.push_str("| Slice | Value | |\n");
    section.push_str("|:---|:---:|:---|\n");

    for slice in chart {
        section.push_str(&format!(
            "| {} | {}% | `{}` |\n",
            slice.name,
            slice.value,
            bar(slice.value)
        ));
    }
    section.push('\n');

    section
}

fn bar(value: u8) -> String {
    let filled = (usize::from(value.min(100)) * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Generate the ranked term table, or the empty-state line.
pub fn generate_terms_table(terms: &[RankedTerm], prominence: &[ProminenceEntry]) -> String {
    if terms.is_empty() {
        return "No significant terms found.\n\n".to_string();
    }

    let mut table = String::new();

    table.push_str("| Rank | Term | Count | Font Size | Opacity |\n");
    table.push_str("|:---:|:---|:---:|:---:|:---:|\n");

    for term in terms {
        let entry = prominence.iter().find(|e| e.term == term.term);
        let (size, opacity) = entry
            .map(|e| (format!("{:.1}px", e.font_size), format!("{:.2}", e.opacity)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));

        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            term.rank + 1,
            term.term,
            term.count,
            size,
            opacity
        ));
    }
    table.push('\n');

    table
}

/// Generate the watch-list keyword table.
pub fn generate_keyword_table(hits: &[KeywordHit]) -> String {
    if hits.is_empty() {
        return "No watch-list keywords found.\n\n".to_string();
    }

    let mut table = String::new();

    table.push_str("| Keyword | Occurrences |\n");
    table.push_str("|:---|:---:|\n");
    for hit in hits {
        table.push_str(&format!("| {} | {} |\n", hit.keyword, hit.count));
    }
    table.push('\n');

    table
}

/// Generate the metadata section.
fn generate_metadata_section(report: &Report<'_>) -> String {
    let snapshot = report.snapshot;
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Service:** {}\n", report.service));
    section.push_str(&format!("- **Request:** #{}\n", snapshot.request));
    section.push_str(&format!(
        "- **Completed:** {}\n",
        snapshot.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n\n",
        snapshot.duration_seconds
    ));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(
        "*Automated classification; treat the verdict as a triage signal, not a fact check.*\n",
    );

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report<'_>) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build_chart, scale_terms};
    use crate::models::{AnalysisResult, Classification, Label, TermOrigin};
    use chrono::Utc;

    fn create_test_snapshot(terms: Vec<RankedTerm>) -> AnalysisSnapshot {
        let classification = Classification {
            label: Label::Fake,
            probability: 72,
        };

        AnalysisSnapshot {
            request: 7,
            result: AnalysisResult {
                label: classification.label,
                probability: classification.probability,
                top_terms: terms.clone(),
            },
            chart: build_chart(&classification),
            prominence: scale_terms(&terms),
            term_origin: TermOrigin::Local,
            keyword_hits: Vec::new(),
            completed_at: Utc::now(),
            duration_seconds: 0.42,
        }
    }

    fn sample_terms() -> Vec<RankedTerm> {
        vec![
            RankedTerm {
                term: "news".to_string(),
                count: 3,
                rank: 0,
            },
            RankedTerm {
                term: "fake".to_string(),
                count: 2,
                rank: 1,
            },
        ]
    }

    #[test]
    fn test_generate_markdown_report() {
        let snapshot = create_test_snapshot(sample_terms());
        let markdown = generate_markdown_report(&Report::new("http://svc", &snapshot));

        assert!(markdown.contains("# ClaimLens Report"));
        assert!(markdown.contains("Likely Misinformation"));
        assert!(markdown.contains("**Confidence:** 72%"));
        assert!(markdown.contains("| Confidence (Fake) | 72% |"));
        assert!(markdown.contains("| Uncertainty | 28% |"));
        assert!(markdown.contains("| 1 | news | 3 | 48.0px | 1.00 |"));
        assert!(markdown.contains("| 2 | fake | 2 | 16.0px | 0.80 |"));
        assert!(markdown.contains("**Request:** #7"));
        assert!(!markdown.contains("Watch-list Hits"));
    }

    #[test]
    fn test_watch_list_section() {
        let mut snapshot = create_test_snapshot(sample_terms());
        snapshot.keyword_hits = vec![
            KeywordHit {
                keyword: "army".to_string(),
                count: 2,
            },
            KeywordHit {
                keyword: "false narrative".to_string(),
                count: 1,
            },
        ];

        let markdown = generate_markdown_report(&Report::new("http://svc", &snapshot));
        assert!(markdown.contains("## Watch-list Hits"));
        assert!(markdown.contains("| army | 2 |"));
        assert!(markdown.contains("| false narrative | 1 |"));

        let json = generate_json_report(&Report::new("http://svc", &snapshot)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["keyword_hits"][0]["keyword"], "army");
        assert_eq!(value["keyword_hits"][1]["count"], 1);
    }

    #[test]
    fn test_empty_keyword_table() {
        assert_eq!(generate_keyword_table(&[]), "No watch-list keywords found.\n\n");
    }

    #[test]
    fn test_empty_terms_state() {
        let snapshot = create_test_snapshot(vec![]);
        let markdown = generate_markdown_report(&Report::new("http://svc", &snapshot));
        assert!(markdown.contains("No significant terms found."));
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(100).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(50).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_generate_json_report() {
        let snapshot = create_test_snapshot(sample_terms());
        let json = generate_json_report(&Report::new("http://svc", &snapshot)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["service"], "http://svc");
        assert_eq!(value["result"]["label"], "fake");
        assert_eq!(value["result"]["probability"], 72);
        assert_eq!(value["chart"][1]["name"], "Uncertainty");
        assert_eq!(value["prominence"][0]["term"], "news");
        assert_eq!(value["term_origin"], "local");
    }
}
