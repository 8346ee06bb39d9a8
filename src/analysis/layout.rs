//! Size and opacity scaling for the term-prominence display.

use crate::models::{ProminenceEntry, RankedTerm};

pub const MIN_FONT_SIZE: f64 = 16.0;
pub const MAX_FONT_SIZE: f64 = 48.0;
pub const MIN_OPACITY: f64 = 0.8;
pub const MAX_OPACITY: f64 = 1.0;

/// Map each term's count linearly onto font size and opacity.
///
/// The smallest count gets the minimum size, the largest the maximum. When
/// every count is equal there is no range to interpolate over, so every
/// entry gets the midpoint of both scales. Output order matches input order.
pub fn scale_terms(terms: &[RankedTerm]) -> Vec<ProminenceEntry> {
    let (min, max) = match count_range(terms) {
        Some(range) => range,
        None => return Vec::new(),
    };

    terms
        .iter()
        .map(|t| {
            let weight = if max == min {
                0.5
            } else {
                (t.count - min) as f64 / (max - min) as f64
            };

            ProminenceEntry {
                term: t.term.clone(),
                count: t.count,
                font_size: lerp(MIN_FONT_SIZE, MAX_FONT_SIZE, weight),
                opacity: lerp(MIN_OPACITY, MAX_OPACITY, weight),
            }
        })
        .collect()
}

fn count_range(terms: &[RankedTerm]) -> Option<(usize, usize)> {
    let min = terms.iter().map(|t| t.count).min()?;
    let max = terms.iter().map(|t| t.count).max()?;
    Some((min, max))
}

fn lerp(low: f64, high: f64, weight: f64) -> f64 {
    low + (high - low) * weight
}
