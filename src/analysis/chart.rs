//! Confidence chart data.

use crate::models::{ChartSlice, Classification, Label};

pub const UNCERTAINTY_SLICE: &str = "Uncertainty";

/// Split a classification into a confidence slice and an uncertainty slice.
///
/// The two values always sum to 100 because `probability` is validated to
/// lie in `[0, 100]` before a `Classification` exists.
pub fn build_chart(classification: &Classification) -> Vec<ChartSlice> {
    let confidence = classification.probability;
    debug_assert!(confidence <= 100, "unvalidated probability {}", confidence);

    let name = match classification.label {
        Label::Fake => "Confidence (Fake)",
        Label::Normal => "Confidence (Normal)",
    };

    vec![
        ChartSlice {
            name: name.to_string(),
            value: confidence,
        },
        ChartSlice {
            name: UNCERTAINTY_SLICE.to_string(),
            value: 100 - confidence,
        },
    ]
}
