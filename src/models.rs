//! Data models for the analysis pipeline.
//!
//! This module contains the core data structures shared by the pipeline
//! stages, the orchestrator and the report generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification label returned by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Likely misinformation
    Fake,
    /// Nothing suspicious detected
    Normal,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Fake => write!(f, "Fake"),
            Label::Normal => write!(f, "Normal"),
        }
    }
}

impl Label {
    /// Parses a wire label. Only the two declared values are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "fake" => Some(Label::Fake),
            "normal" => Some(Label::Normal),
            _ => None,
        }
    }

    /// Human-facing verdict line.
    pub fn headline(&self) -> &'static str {
        match self {
            Label::Fake => "Likely Misinformation",
            Label::Normal => "Normal",
        }
    }

    /// Returns an emoji representation of the label.
    pub fn emoji(&self) -> &'static str {
        match self {
            Label::Fake => "🔴",
            Label::Normal => "🟢",
        }
    }
}

/// A validated classification: label plus integer confidence in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,
    pub probability: u8,
}

/// A term with its occurrence count and 0-based rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub count: usize,
    pub rank: usize,
}

/// One wedge of the confidence chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: u8,
}

/// Visual weight of a single term in the word cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProminenceEntry {
    pub term: String,
    pub count: usize,
    /// Font size in pixels, within `[16, 48]`.
    pub font_size: f64,
    /// Opacity within `[0.8, 1.0]`.
    pub opacity: f64,
}

/// A watch-list keyword found in the submitted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub keyword: String,
    /// Whole-word occurrences; always at least one.
    pub count: usize,
}

/// Where the ranked terms came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermOrigin {
    /// Tokenized from the submitted text.
    Local,
    /// Supplied by the classification service's word list.
    Service,
}

impl fmt::Display for TermOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermOrigin::Local => write!(f, "local tokenizer"),
            TermOrigin::Service => write!(f, "classification service"),
        }
    }
}

/// Outcome of a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: Label,
    pub probability: u8,
    pub top_terms: Vec<RankedTerm>,
}

/// Read-only view handed to the presentation layer when a run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    /// Request token of the run that produced this snapshot.
    pub request: u64,
    pub result: AnalysisResult,
    pub chart: Vec<ChartSlice>,
    pub prominence: Vec<ProminenceEntry>,
    pub term_origin: TermOrigin,
    #[serde(default)]
    pub keyword_hits: Vec<KeywordHit>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: f64,
}

impl AnalysisSnapshot {
    /// True when no salient terms survived tokenization.
    pub fn has_terms(&self) -> bool {
        !self.result.top_terms.is_empty()
    }
}
