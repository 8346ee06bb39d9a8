//! Classification gateway contract.
//!
//! The classifier itself is external. This module defines the async seam the
//! pipeline calls through and the validation applied to whatever comes back.

pub mod http;

pub use http::{HttpClassifier, HttpClassifierConfig};

use crate::analysis::{is_term, ServiceTerms};
use crate::error::AnalysisError;
use crate::models::{Classification, Label};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// External capability that labels a piece of text.
#[async_trait]
pub trait ClassifierGateway: Send + Sync {
    /// Classify `text`. This is the only suspension point of a run.
    async fn classify(&self, text: &str) -> Result<GatewayReply, AnalysisError>;

    /// Short name used in logs and reports.
    fn name(&self) -> &str;
}

/// Unvalidated reply from a gateway, shaped like the service's JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayReply {
    pub label: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordcloud: Option<WordCloud>,
}

/// Word counts the service may attach to its reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    #[serde(default)]
    pub words: Map<String, Value>,
}

impl GatewayReply {
    /// Convenience constructor for a reply without word counts.
    #[allow(dead_code)] // Used by in-process gateways and tests
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
            wordcloud: None,
        }
    }

    /// Attach service word counts, preserving the given order.
    #[allow(dead_code)] // Used by in-process gateways and tests
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(|(term, count)| (term.into(), Value::from(count)))
            .collect();
        self.wordcloud = Some(WordCloud { words });
        self
    }

    /// Check the reply against the declared domain.
    ///
    /// Labels other than `fake`/`normal` and probabilities outside
    /// `[0, 100]` are contract violations; nothing is clamped. Fractional
    /// probabilities inside the range are rounded to the nearest integer.
    pub fn classification(&self) -> Result<Classification, AnalysisError> {
        let label = Label::parse(&self.label).ok_or_else(|| {
            AnalysisError::ContractViolation(format!("unknown label {:?}", self.label))
        })?;

        let p = self.probability;
        if !p.is_finite() || !(0.0..=100.0).contains(&p) {
            return Err(AnalysisError::ContractViolation(format!(
                "probability {} outside [0, 100]",
                p
            )));
        }

        Ok(Classification {
            label,
            probability: p.round() as u8,
        })
    }

    /// Service-supplied word counts, if the reply carried any.
    ///
    /// Every key must already be a normalized term and every count a
    /// positive integer.
    pub fn service_terms(&self) -> Result<Option<ServiceTerms>, AnalysisError> {
        let Some(cloud) = &self.wordcloud else {
            return Ok(None);
        };

        let mut words = Vec::with_capacity(cloud.words.len());
        for (term, value) in &cloud.words {
            if !is_term(term) {
                return Err(AnalysisError::ContractViolation(format!(
                    "word {:?} is not a normalized term",
                    term
                )));
            }
            let count = value.as_u64().filter(|c| *c > 0).ok_or_else(|| {
                AnalysisError::ContractViolation(format!(
                    "word {:?} has invalid count {}",
                    term, value
                ))
            })?;
            words.push((term.clone(), count as usize));
        }

        Ok(Some(ServiceTerms::new(words)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_reply() {
        let reply = GatewayReply::new("fake", 72.0);
        assert_eq!(
            reply.classification().unwrap(),
            Classification {
                label: Label::Fake,
                probability: 72
            }
        );
    }

    #[test]
    fn test_fractional_probability_rounds() {
        assert_eq!(
            GatewayReply::new("normal", 85.5).classification().unwrap().probability,
            86
        );
        assert_eq!(
            GatewayReply::new("normal", 99.99).classification().unwrap().probability,
            100
        );
    }

    #[test]
    fn test_out_of_range_probability_is_violation() {
        for p in [-0.5, 100.01, 250.0, f64::NAN, f64::INFINITY] {
            let err = GatewayReply::new("fake", p).classification().unwrap_err();
            assert!(matches!(err, AnalysisError::ContractViolation(_)), "{p}");
        }
    }

    #[test]
    fn test_unknown_label_is_violation() {
        for label in ["real", "FAKE", "", "misleading"] {
            let err = GatewayReply::new(label, 50.0).classification().unwrap_err();
            assert!(matches!(err, AnalysisError::ContractViolation(_)));
        }
    }

    #[test]
    fn test_parse_service_body() {
        let body = r#"{
            "probability": 85,
            "label": "fake",
            "wordcloud": { "words": { "undeveloped": 1, "hoax": 3 } }
        }"#;
        let reply: GatewayReply = serde_json::from_str(body).unwrap();
        let terms = reply.service_terms().unwrap().unwrap();

        assert_eq!(
            terms.words(),
            &[("undeveloped".to_string(), 1), ("hoax".to_string(), 3)]
        );
    }

    #[test]
    fn test_missing_wordcloud() {
        let reply: GatewayReply =
            serde_json::from_str(r#"{"probability": 10, "label": "normal"}"#).unwrap();
        assert_eq!(reply.service_terms().unwrap(), None);
    }

    #[test]
    fn test_bad_word_counts_are_violations() {
        for bad in [r#"0"#, r#"-2"#, r#"1.5"#, r#""three""#] {
            let count: Value = serde_json::from_str(bad).unwrap();
            let body = serde_json::json!({
                "probability": 10,
                "label": "normal",
                "wordcloud": { "words": { "xyz": count } }
            });
            let reply: GatewayReply = serde_json::from_value(body).unwrap();
            assert!(matches!(
                reply.service_terms(),
                Err(AnalysisError::ContractViolation(_))
            ));
        }
    }

    #[test]
    fn test_bad_word_keys_are_violations() {
        for bad in ["Hello World!", "a", "ok", "Hoax", "covid19", ""] {
            let reply = GatewayReply::new("fake", 60.0).with_words([(bad, 3u64), ("hoax", 2)]);
            assert!(
                matches!(
                    reply.service_terms(),
                    Err(AnalysisError::ContractViolation(_))
                ),
                "{bad:?}"
            );
        }
    }
}
