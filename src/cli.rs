//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::MAX_TOP_N;
use crate::orchestrator::TermSourcePreference;
use clap::Parser;
use std::path::PathBuf;

/// ClaimLens - misinformation triage for a block of text
///
/// Sends the text to a classification service and reports the label,
/// the confidence breakdown and the most prominent terms.
///
/// Examples:
///   claimlens --text "Breaking: miracle cure suppressed by doctors"
///   claimlens --file article.txt --format json --output result.json
///   cat post.txt | claimlens --endpoint http://classifier:8000
///   claimlens --file article.txt --dry-run --watch army,government
///   claimlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Text to analyze
    #[arg(short, long, value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text to analyze from a file
    ///
    /// When neither --text nor --file is given, the text is read from stdin.
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Root URL of the classification service
    #[arg(short, long, value_name = "URL", env = "CLAIMLENS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .claimlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of terms to keep for the word cloud (1-10)
    #[arg(long, value_name = "COUNT")]
    pub top_n: Option<usize>,

    /// Where word-cloud terms come from
    #[arg(long, value_name = "SOURCE")]
    pub terms: Option<TermSourcePreference>,

    /// Words to ignore when extracting terms (comma-separated)
    ///
    /// Example: --stopwords the,and,with
    #[arg(long, value_name = "WORDS", value_delimiter = ',')]
    pub stopwords: Option<Vec<String>>,

    /// Keywords to report when they occur in the text (comma-separated)
    ///
    /// Matched on whole words; phrases are allowed. Example: --watch army,pm
    #[arg(long, value_name = "WORDS", value_delimiter = ',')]
    pub watch: Option<Vec<String>>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Exit with code 2 when the text is labelled fake
    ///
    /// Useful for moderation pipelines.
    #[arg(long)]
    pub fail_on_fake: bool,

    /// Dry run: extract and scale terms without calling the service
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .claimlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref endpoint) = self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("Endpoint URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(top_n) = self.top_n {
            if top_n == 0 || top_n > MAX_TOP_N {
                return Err(format!("Top-n must be between 1 and {}", MAX_TOP_N));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if let Some(ref file) = self.file {
            if !file.is_file() {
                return Err(format!("Input file does not exist: {}", file.display()));
            }
        }

        Ok(())
    }

    /// Whether to draw the progress spinner. JSON going to stdout is meant
    /// for pipes, so it counts as quiet.
    pub fn shows_progress(&self) -> bool {
        let json_to_stdout = self.format == OutputFormat::Json && self.output.is_none();
        !self.quiet && !json_to_stdout
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            text: Some("some text".to_string()),
            file: None,
            endpoint: None,
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            top_n: None,
            terms: None,
            stopwords: None,
            watch: None,
            timeout: None,
            fail_on_fake: false,
            dry_run: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_endpoint() {
        let mut args = make_args();
        args.endpoint = Some("ftp://example.com".to_string());
        assert!(args.validate().is_err());

        args.endpoint = Some("https://example.com".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.top_n = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_top_n_upper_bound() {
        let mut args = make_args();
        args.top_n = Some(10);
        assert!(args.validate().is_ok());

        args.top_n = Some(15);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_file() {
        let mut args = make_args();
        args.text = None;
        args.file = Some(PathBuf::from("/definitely/not/here.txt"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_shows_progress() {
        let mut args = make_args();
        assert!(args.shows_progress());

        args.format = OutputFormat::Json;
        assert!(!args.shows_progress());

        args.output = Some(PathBuf::from("report.json"));
        assert!(args.shows_progress());

        args.quiet = true;
        assert!(!args.shows_progress());
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "claimlens",
            "--text",
            "hello world",
            "--terms",
            "prefer-service",
            "--stopwords",
            "the,and",
            "--format",
            "json",
            "--watch",
            "army,false narrative",
        ])
        .unwrap();

        assert_eq!(args.text.as_deref(), Some("hello world"));
        assert_eq!(args.terms, Some(TermSourcePreference::PreferService));
        assert_eq!(args.stopwords, Some(vec!["the".to_string(), "and".to_string()]));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(
            args.watch,
            Some(vec!["army".to_string(), "false narrative".to_string()])
        );
    }
}
