//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.claimlens.toml` files.

use crate::analysis::{
    KeywordWatchList, Tokenizer, DEFAULT_MIN_TERM_LEN, DEFAULT_TOP_N, MAX_TOP_N,
};
use crate::gateway::HttpClassifierConfig;
use crate::orchestrator::{PipelineOptions, TermSourcePreference};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".claimlens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Classification service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Term extraction settings.
    #[serde(default)]
    pub terms: TermsConfig,

    /// Keywords reported when they occur in the text.
    #[serde(default)]
    pub watchlist: WatchlistConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Exit with code 2 when the text is labelled fake.
    #[serde(default)]
    pub fail_on_fake: bool,
}

/// Classification service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Root URL of the classification service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Term extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermsConfig {
    /// Number of terms shown in the word cloud.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Shortest token kept as a term.
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,

    /// Words dropped after normalization.
    #[serde(default)]
    pub stopwords: Vec<String>,

    /// Where ranked terms come from.
    #[serde(default)]
    pub source: TermSourcePreference,
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_term_len: default_min_term_len(),
            stopwords: Vec::new(),
            source: TermSourcePreference::default(),
        }
    }
}

/// Watch-list settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// Words or phrases to look for, matched on whole words.
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_min_term_len() -> usize {
    DEFAULT_MIN_TERM_LEN
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.terms.top_n == 0 || self.terms.top_n > MAX_TOP_N {
            bail!(
                "terms.top_n must be between 1 and {} (got {})",
                MAX_TOP_N,
                self.terms.top_n
            );
        }
        if self.terms.min_term_len < DEFAULT_MIN_TERM_LEN {
            bail!(
                "terms.min_term_len must be at least {} (got {})",
                DEFAULT_MIN_TERM_LEN,
                self.terms.min_term_len
            );
        }
        if self.service.timeout_seconds == 0 {
            bail!("service.timeout_seconds must be at least 1");
        }
        Ok(())
    }

    /// Try to load configuration from `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref endpoint) = args.endpoint {
            self.service.endpoint = endpoint.clone();
        }
        if let Some(timeout) = args.timeout {
            self.service.timeout_seconds = timeout;
        }

        if let Some(top_n) = args.top_n {
            self.terms.top_n = top_n;
        }
        if let Some(source) = args.terms {
            self.terms.source = source;
        }
        if let Some(ref stopwords) = args.stopwords {
            self.terms.stopwords = stopwords.clone();
        }
        if let Some(ref keywords) = args.watch {
            self.watchlist.keywords = keywords.clone();
        }

        // Flags always override
        if args.fail_on_fake {
            self.general.fail_on_fake = true;
        }
    }

    /// Pipeline options derived from the `[terms]` section.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            tokenizer: Tokenizer::new(self.terms.min_term_len, &self.terms.stopwords),
            top_n: self.terms.top_n,
            term_source: self.terms.source,
            watchlist: KeywordWatchList::new(&self.watchlist.keywords),
        }
    }

    /// HTTP classifier settings derived from the `[service]` section.
    pub fn classifier_config(&self) -> HttpClassifierConfig {
        HttpClassifierConfig {
            endpoint: self.service.endpoint.clone(),
            timeout_seconds: self.service.timeout_seconds,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
