//! Text analysis and visualization data.
//!
//! The pipeline stages are pure functions over owned data; the orchestrator
//! sequences them per submission.

pub mod chart;
pub mod frequency;
pub mod keywords;
pub mod layout;
pub mod ranking;
pub mod terms;
pub mod tokenizer;

pub use chart::build_chart;
pub use frequency::FrequencyTable;
pub use keywords::KeywordWatchList;
pub use layout::scale_terms;
pub use ranking::{top_terms, DEFAULT_TOP_N, MAX_TOP_N};
pub use terms::{LocalTerms, ServiceTerms, TermSource};
pub use tokenizer::{is_term, Tokenizer, DEFAULT_MIN_TERM_LEN};
