//! Serialized message ingestion.
//!
//! Convergence correctness depends on read-modify-write atomicity of the
//! proposal/result/vote triad, so messages for the same subject must never
//! interleave. Each subject gets a lane (a mutex); independent lanes run
//! concurrently under a global semaphore.

use agora_governance::{GovernanceEngine, ProcessingOutcome};
use agora_messages::{EnvelopeMeta, MarketMessage};
use agora_store::ProposalStore;
use agora_types::Subject;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tracing::debug;

use crate::IngestMetrics;

/// Per-subject serialized front door to the reconciliation engine.
pub struct IngestService {
    engine: Arc<GovernanceEngine>,
    proposals: Arc<dyn ProposalStore + Send + Sync>,
    /// Per-subject lanes; a held lane serializes everything for one subject.
    lanes: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Bounds total in-flight processing across all lanes.
    semaphore: Arc<Semaphore>,
    metrics: Arc<IngestMetrics>,
}

impl IngestService {
    pub fn new(
        engine: GovernanceEngine,
        proposals: Arc<dyn ProposalStore + Send + Sync>,
        max_concurrent: usize,
        metrics: Arc<IngestMetrics>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            proposals,
            lanes: Mutex::new(HashMap::new()),
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            metrics,
        }
    }

    /// Ingest one decoded message under its subject's lane and report the
    /// terminal status back to the delivery subsystem.
    pub async fn notify(&self, message: &MarketMessage, meta: &EnvelopeMeta) -> ProcessingOutcome {
        self.metrics.messages_received.inc();
        let started = Instant::now();

        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("ingest semaphore is never closed");

        // A vote's subject is only known once its proposal is resolved, and
        // the proposal may land between resolving and locking. Re-resolve
        // under the lane and fall through only when the lane still matches.
        let outcome = loop {
            let lane_key = self.lane_key(message);
            let lane = self.lane(&lane_key).await;
            let _guard = lane.lock().await;
            if self.lane_key(message) != lane_key {
                continue;
            }

            let engine = Arc::clone(&self.engine);
            let message = message.clone();
            let meta = *meta;
            break tokio::task::spawn_blocking(move || engine.notify(&message, &meta))
                .await
                .expect("engine.notify never panics");
        };

        self.metrics
            .process_time_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        debug!(?outcome, "message ingested");
        match outcome {
            ProcessingOutcome::Processed => self.metrics.processed.inc(),
            ProcessingOutcome::Waiting => self.metrics.waiting.inc(),
            ProcessingOutcome::ParsingFailed => self.metrics.parsing_failed.inc(),
        }
        outcome
    }

    /// The lane a message serializes under.
    ///
    /// Proposal announcements know their subject. Votes reference a proposal
    /// hash; if that proposal is stored, its subject is the lane, otherwise
    /// the hash itself is (the engine will report `Waiting` there anyway).
    fn lane_key(&self, message: &MarketMessage) -> String {
        match message {
            MarketMessage::Proposal(p) => p.subject().to_string(),
            MarketMessage::Vote(v) => match self.proposals.find_by_hash(&v.proposal) {
                Ok(Some(stored)) => stored.subject().to_string(),
                _ => Subject::Proposal(v.proposal).to_string(),
            },
        }
    }

    async fn lane(&self, key: &str) -> Arc<Mutex<()>> {
        let mut lanes = self.lanes.lock().await;
        lanes
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of lanes currently tracked.
    pub async fn lane_count(&self) -> usize {
        self.lanes.lock().await.len()
    }

    /// Drop lanes nobody is waiting on.
    pub async fn cleanup(&self) {
        let mut lanes = self.lanes.lock().await;
        lanes.retain(|_, lane| Arc::strong_count(lane) > 1);
    }
}
