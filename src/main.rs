//! ClaimLens - misinformation triage for free-form text
//!
//! A CLI tool that sends text to a classification service and renders
//! the verdict, a confidence breakdown and a term-prominence table.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (empty input, service failure, bad config, etc.)
//!   2 - Text labelled fake and --fail-on-fake set

mod analysis;
mod cli;
mod config;
mod error;
mod gateway;
mod models;
mod orchestrator;
mod report;
mod session;

use analysis::TermSource;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use gateway::HttpClassifier;
use indicatif::{ProgressBar, ProgressStyle};
use models::Label;
use orchestrator::Phase;
use session::AnalysisSession;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("ClaimLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_analysis(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .claimlens.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the service endpoint, term count and stop words.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one analysis. Returns the exit code (0 or 2).
async fn run_analysis(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let text = read_input(&args)?;
    debug!("Read {} bytes of input", text.len());

    if args.dry_run {
        return handle_dry_run(&config, &text);
    }

    let classifier = HttpClassifier::new(config.classifier_config())
        .context("Failed to set up the classification client")?;
    info!("Classifying via {}", classifier.analyze_url());

    let mut session = AnalysisSession::new(config.pipeline_options(), Arc::new(classifier));

    if let Err(e) = session.submit(&text) {
        eprintln!("⚠️  {}", e.user_message());
        return Ok(1);
    }

    let spinner = args.shows_progress().then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Waiting for {}", session.gateway_name()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    // Ctrl-C abandons the in-flight request; its reply, if any, is ignored.
    let settled = tokio::select! {
        phase = session.run_until_settled() => Some(phase),
        _ = tokio::signal::ctrl_c() => None,
    };

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let phase = match settled {
        Some(phase) => phase,
        None => {
            if let Some(token) = session.cancel() {
                warn!("Interrupted; abandoned analysis {}", token);
            }
            eprintln!("⚠️  Analysis cancelled.");
            return Ok(1);
        }
    };

    let orchestrator = session.orchestrator();
    debug!("Phases: {:?}", orchestrator.transitions());
    let snapshot = match (phase, orchestrator.snapshot()) {
        (Phase::Done, Some(snapshot)) => snapshot,
        _ => {
            if let Some(err) = orchestrator.error() {
                debug!("Failure detail: {:?}", err);
            }
            let message = orchestrator
                .failure()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| format!("Analysis ended in phase: {}", phase));
            eprintln!("❌ {}", message);
            return Ok(1);
        }
    };

    if !snapshot.has_terms() {
        info!("No significant terms found in the input");
    }

    let report = report::Report::new(session.gateway_name(), &snapshot);
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                eprintln!("✅ Report saved to: {}", path.display());
            }
        }
        None => println!("{}", output),
    }

    if config.general.fail_on_fake && snapshot.result.label == Label::Fake {
        warn!(
            "Text labelled fake at {}% confidence (exit code 2)",
            snapshot.result.probability
        );
        return Ok(2);
    }

    Ok(0)
}

/// Handle --dry-run: extract and scale terms locally, no service call.
fn handle_dry_run(config: &Config, text: &str) -> Result<i32> {
    if text.trim().is_empty() {
        eprintln!("⚠️  {}", error::AnalysisError::EmptyInput.user_message());
        return Ok(1);
    }

    let options = config.pipeline_options();
    let local = analysis::LocalTerms::new(options.tokenizer.tokenize(text));
    let table = local.frequencies();
    let terms = local.rank(options.top_n);
    let prominence = analysis::scale_terms(&terms);

    println!("🔍 Dry run: local term extraction (no classification call)\n");
    println!("   Tokens: {}", table.total());
    println!("   Distinct terms: {}", table.len());
    println!("   Terms shown: {}\n", terms.len());
    print!("{}", report::generate_terms_table(&terms, &prominence));
    if !options.watchlist.is_empty() {
        let hits = options.watchlist.hits(text);
        println!(
            "   Watch-list hits: {} of {} keywords\n",
            hits.len(),
            options.watchlist.len()
        );
        print!("{}", report::generate_keyword_table(&hits));
    }
    println!("✅ Dry run complete. No service calls were made.");

    Ok(0)
}

/// Read the text to analyze from --text, --file or stdin.
fn read_input(args: &Args) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = args.file {
        info!("Reading input from: {}", path.display());
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read input from stdin")?;
    Ok(buffer)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_from_dir(Path::new(".")) {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
