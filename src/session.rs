//! Async driver around the orchestrator.
//!
//! The session plays the role of the UI event loop: the classification call
//! runs on a spawned task and posts its outcome back over a channel, and only
//! the session applies outcomes to the orchestrator. Submitting while a run
//! is in flight aborts that task and replaces the run.

use crate::error::AnalysisError;
use crate::gateway::{ClassifierGateway, GatewayReply};
use crate::orchestrator::{AnalysisOrchestrator, Completion, Phase, PipelineOptions, RequestToken};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

type Outcome = (RequestToken, Result<GatewayReply, AnalysisError>);

pub struct AnalysisSession {
    orchestrator: AnalysisOrchestrator,
    gateway: Arc<dyn ClassifierGateway>,
    task: Option<JoinHandle<()>>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl AnalysisSession {
    pub fn new(options: PipelineOptions, gateway: Arc<dyn ClassifierGateway>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            orchestrator: AnalysisOrchestrator::new(options),
            gateway,
            task: None,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn orchestrator(&self) -> &AnalysisOrchestrator {
        &self.orchestrator
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Start a new run, replacing any run still awaiting classification.
    ///
    /// Validation failures are returned directly and never reach the gateway.
    pub fn submit(&mut self, text: &str) -> Result<RequestToken, AnalysisError> {
        self.abort_task();
        let submission = self.orchestrator.begin(text)?;

        let gateway = Arc::clone(&self.gateway);
        let tx = self.outcome_tx.clone();
        let token = submission.token;

        self.task = Some(tokio::spawn(async move {
            let outcome = gateway.classify(&submission.text).await;
            // The receiver lives as long as the session; a send error only
            // means the session was dropped.
            let _ = tx.send((token, outcome));
        }));

        debug!("Dispatched {} to {}", token, self.gateway.name());
        Ok(token)
    }

    /// Abandon the in-flight run.
    pub fn cancel(&mut self) -> Option<RequestToken> {
        self.abort_task();
        self.orchestrator.cancel()
    }

    /// Wait for the next gateway outcome and apply it.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let (token, outcome) = self.outcome_rx.recv().await?;
        Some(self.orchestrator.complete(token, outcome))
    }

    /// Apply outcomes until the current run settles, then return its phase.
    pub async fn run_until_settled(&mut self) -> Phase {
        while self.orchestrator.phase() == Phase::AwaitingClassification {
            if self.next_completion().await.is_none() {
                break;
            }
        }
        self.task = None;
        self.orchestrator.phase()
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        self.abort_task();
    }
}
