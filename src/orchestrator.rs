//! Per-submission state machine.
//!
//! The orchestrator is the single writer of the current result slot. Each
//! submission gets a fresh, strictly increasing [`RequestToken`]; a gateway
//! reply is applied only if its token matches the run that is still in
//! flight, so a superseded or cancelled run can never overwrite newer state.
//!
//! A new submission while another is awaiting classification replaces it
//! (cancel-and-replace).

use crate::analysis::{
    build_chart, scale_terms, KeywordWatchList, LocalTerms, TermSource, Tokenizer, DEFAULT_TOP_N,
};
use crate::error::{AnalysisError, ErrorKind, FailureReport};
use crate::gateway::{ClassifierGateway, GatewayReply};
use crate::models::{AnalysisResult, AnalysisSnapshot, KeywordHit, RankedTerm, TermOrigin};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Phases of a single analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Tokenizing,
    CountingAndRanking,
    AwaitingClassification,
    Composing,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Validating => "validating",
            Phase::Tokenizing => "tokenizing",
            Phase::CountingAndRanking => "counting & ranking",
            Phase::AwaitingClassification => "awaiting classification",
            Phase::Composing => "composing",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Identifies one submission. Later submissions always compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which term data the composed result should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TermSourcePreference {
    /// Always use the locally tokenized text.
    #[default]
    Local,
    /// Always use the service's word list (empty when it sends none).
    Service,
    /// Use the service's word list when present, else local terms.
    PreferService,
}

/// Knobs for the local half of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub tokenizer: Tokenizer,
    pub top_n: usize,
    pub term_source: TermSourcePreference,
    pub watchlist: KeywordWatchList,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            top_n: DEFAULT_TOP_N,
            term_source: TermSourcePreference::Local,
            watchlist: KeywordWatchList::default(),
        }
    }
}

/// Handed to the caller by [`AnalysisOrchestrator::begin`]; carries what the
/// gateway call needs.
#[derive(Debug, Clone)]
pub struct Submission {
    pub token: RequestToken,
    pub text: Arc<str>,
}

/// Result of feeding a gateway outcome back into the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome belonged to the current run and settled it.
    Applied(Phase),
    /// The outcome belonged to a superseded or cancelled run and was dropped.
    Stale,
}

/// Local work finished before the gateway call.
#[derive(Debug)]
struct InFlight {
    token: RequestToken,
    local_terms: Vec<RankedTerm>,
    keyword_hits: Vec<KeywordHit>,
    started: Instant,
}

#[derive(Debug)]
enum State {
    Idle,
    Awaiting(InFlight),
    Done(Arc<AnalysisSnapshot>),
    Failed(FailureReport, AnalysisError),
}

pub struct AnalysisOrchestrator {
    options: PipelineOptions,
    state: State,
    last_token: u64,
    transitions: Vec<Phase>,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

impl AnalysisOrchestrator {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            state: State::Idle,
            last_token: 0,
            transitions: vec![Phase::Idle],
        }
    }

    /// Current phase. Transient phases are never observable from outside.
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Awaiting(_) => Phase::AwaitingClassification,
            State::Done(_) => Phase::Done,
            State::Failed(..) => Phase::Failed,
        }
    }

    /// Phases visited by the current run, starting at `Idle`.
    pub fn transitions(&self) -> &[Phase] {
        &self.transitions
    }

    /// Token of the run awaiting classification, if any.
    pub fn in_flight(&self) -> Option<RequestToken> {
        match &self.state {
            State::Awaiting(run) => Some(run.token),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<Arc<AnalysisSnapshot>> {
        match &self.state {
            State::Done(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReport> {
        match &self.state {
            State::Failed(report, _) => Some(report),
            _ => None,
        }
    }

    /// The error that ended the current run, if it failed.
    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.state {
            State::Failed(_, err) => Some(err),
            _ => None,
        }
    }

    fn enter(&mut self, phase: Phase) {
        debug!("analysis phase -> {}", phase);
        self.transitions.push(phase);
    }

    fn fail(&mut self, token: RequestToken, err: &AnalysisError) {
        match err.kind() {
            ErrorKind::ContractViolation => {
                error!("Classification contract violation on {}: {}", token, err)
            }
            ErrorKind::Service => warn!("Classification failed on {}: {}", token, err),
            ErrorKind::Validation => info!("Rejected submission {}: {}", token, err),
        }

        self.enter(Phase::Failed);
        let report = FailureReport {
            request: token.value(),
            kind: err.kind(),
            message: err.user_message(),
        };
        self.state = State::Failed(report, err.clone());
    }

    /// Start a run: validate, tokenize, count and rank locally, then wait for
    /// the gateway. Any in-flight run is superseded.
    pub fn begin(&mut self, text: &str) -> Result<Submission, AnalysisError> {
        if let Some(previous) = self.in_flight() {
            info!("Superseding in-flight analysis {}", previous);
        }

        self.last_token += 1;
        let token = RequestToken(self.last_token);
        let started = Instant::now();

        // Moving out of Done/Failed drops the previous result.
        self.state = State::Idle;
        self.transitions = vec![Phase::Idle];

        self.enter(Phase::Validating);
        if text.trim().is_empty() {
            let err = AnalysisError::EmptyInput;
            self.fail(token, &err);
            return Err(err);
        }

        self.enter(Phase::Tokenizing);
        let local = LocalTerms::new(self.options.tokenizer.tokenize(text));
        debug!("{} tokens for {}", local.tokens().len(), token);
        let keyword_hits = self.options.watchlist.hits(text);
        if !keyword_hits.is_empty() {
            debug!("{} watch-list keywords hit for {}", keyword_hits.len(), token);
        }

        self.enter(Phase::CountingAndRanking);
        let local_terms = local.rank(self.options.top_n);

        self.enter(Phase::AwaitingClassification);
        self.state = State::Awaiting(InFlight {
            token,
            local_terms,
            keyword_hits,
            started,
        });

        Ok(Submission {
            token,
            text: Arc::from(text),
        })
    }

    /// Abandon the in-flight run, if any. Its reply will be treated as stale.
    pub fn cancel(&mut self) -> Option<RequestToken> {
        let token = self.in_flight()?;
        info!("Cancelled analysis {}", token);
        self.state = State::Idle;
        self.transitions = vec![Phase::Idle];
        Some(token)
    }

    /// Apply a gateway outcome for `token`.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<GatewayReply, AnalysisError>,
    ) -> Completion {
        let run = match std::mem::replace(&mut self.state, State::Idle) {
            State::Awaiting(run) if run.token == token => run,
            other => {
                self.state = other;
                debug!("Discarding stale reply for {}", token);
                return Completion::Stale;
            }
        };

        match outcome.and_then(|reply| self.compose(&run, &reply)) {
            Ok(snapshot) => {
                self.enter(Phase::Done);
                info!(
                    "Analysis {} done: {} at {}%",
                    token, snapshot.result.label, snapshot.result.probability
                );
                self.state = State::Done(Arc::new(snapshot));
                Completion::Applied(Phase::Done)
            }
            Err(err) => {
                self.fail(token, &err);
                Completion::Applied(Phase::Failed)
            }
        }
    }

    fn compose(
        &mut self,
        run: &InFlight,
        reply: &GatewayReply,
    ) -> Result<AnalysisSnapshot, AnalysisError> {
        let classification = reply.classification()?;
        let service_terms = reply.service_terms()?;
        if let Some(ref terms) = service_terms {
            debug!("Service supplied {} words for {}", terms.words().len(), run.token);
        }

        self.enter(Phase::Composing);

        let (top_terms, term_origin) = match (self.options.term_source, service_terms) {
            (TermSourcePreference::Local, _) => (run.local_terms.clone(), TermOrigin::Local),
            (TermSourcePreference::Service, Some(terms))
            | (TermSourcePreference::PreferService, Some(terms)) => {
                (terms.rank(self.options.top_n), terms.origin())
            }
            (TermSourcePreference::Service, None) => (Vec::new(), TermOrigin::Service),
            (TermSourcePreference::PreferService, None) => {
                (run.local_terms.clone(), TermOrigin::Local)
            }
        };

        let chart = build_chart(&classification);
        let prominence = scale_terms(&top_terms);

        Ok(AnalysisSnapshot {
            request: run.token.value(),
            result: AnalysisResult {
                label: classification.label,
                probability: classification.probability,
                top_terms,
            },
            chart,
            prominence,
            term_origin,
            keyword_hits: run.keyword_hits.clone(),
            completed_at: Utc::now(),
            duration_seconds: run.started.elapsed().as_secs_f64(),
        })
    }

    /// Run one submission end to end against `gateway`.
    ///
    /// The CLI goes through [`crate::session::AnalysisSession`] instead so it
    /// can cancel; this is the direct sequential form.
    #[allow(dead_code)]
    pub async fn analyze<G>(
        &mut self,
        gateway: &G,
        text: &str,
    ) -> Result<Arc<AnalysisSnapshot>, AnalysisError>
    where
        G: ClassifierGateway + ?Sized,
    {
        let submission = self.begin(text)?;
        let outcome = gateway.classify(&submission.text).await;
        self.complete(submission.token, outcome);

        match self.snapshot() {
            Some(snapshot) => Ok(snapshot),
            None => Err(self.error().cloned().unwrap_or_else(|| {
                AnalysisError::Transport("analysis did not settle".to_string())
            })),
        }
    }
}
