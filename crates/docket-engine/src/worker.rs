//! Background recompute worker with cancel-and-restart semantics

use crate::{
    CancelToken, CaseAnalysis, CaseEngine, CaseSnapshot, EngineConfig, EngineError, EngineMetrics,
    ResolvedScenario,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Inputs of one recomputation
#[derive(Debug, Clone)]
pub struct RecomputeRequest {
    /// Case data, shared with the caller
    pub snapshot: Arc<CaseSnapshot>,

    /// Scenario to evaluate
    pub scenario: ResolvedScenario,
}

/// Latest-wins slot for published analyses
pub type AnalysisSlot = Option<Arc<CaseAnalysis>>;

/// Recomputes case analyses in the background, latest request wins
///
/// Every [`submit`](RecomputeWorker::submit) cancels the computation in flight
/// and starts a fresh one on the blocking pool. Finished analyses are
/// published on a `watch` channel tagged with their generation; a result is
/// published only if no newer request has been submitted since, so the slot
/// never goes backwards and never mixes partial results.
///
/// Must be used from within a Tokio runtime.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use docket_domain::EntityId;
/// use docket_engine::{
///     CaseSnapshot, EngineConfig, RecomputeRequest, RecomputeWorker, ResolvedScenario,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut worker = RecomputeWorker::new(EngineConfig::fast());
///     let mut updates = worker.subscribe();
///
///     worker.submit(RecomputeRequest {
///         snapshot: Arc::new(CaseSnapshot::new(EntityId::new())),
///         scenario: ResolvedScenario::engine_defaults(),
///     });
///
///     updates.changed().await?;
///     if let Some(analysis) = updates.borrow().as_ref() {
///         println!("exposure: {}", analysis.report.total_expected_value);
///     }
///     Ok(())
/// }
/// ```
pub struct RecomputeWorker {
    config: EngineConfig,
    latest: Arc<AtomicU64>,
    current: Option<CancelToken>,
    tasks: Vec<JoinHandle<()>>,
    slot: Arc<watch::Sender<AnalysisSlot>>,
    metrics: Arc<Mutex<EngineMetrics>>,
}

impl RecomputeWorker {
    /// Create a worker with the given engine configuration
    pub fn new(config: EngineConfig) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            config,
            latest: Arc::new(AtomicU64::new(0)),
            current: None,
            tasks: Vec::new(),
            slot: Arc::new(slot),
            metrics: Arc::new(Mutex::new(EngineMetrics::new())),
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Start recomputing, cancelling whatever is in flight
    ///
    /// Returns the generation assigned to this request.
    pub fn submit(&mut self, request: RecomputeRequest) -> u64 {
        self.cancel();
        self.tasks.retain(|t| !t.is_finished());

        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let cancel = CancelToken::new();
        self.current = Some(cancel.clone());

        tracing::debug!(
            "Recompute generation {} submitted (case {}, scenario '{}')",
            generation,
            request.snapshot.case_id,
            request.scenario.name
        );

        let config = self.config.clone();
        let latest = Arc::clone(&self.latest);
        let slot = Arc::clone(&self.slot);
        let metrics = Arc::clone(&self.metrics);

        let handle = tokio::task::spawn_blocking(move || {
            let mut engine = CaseEngine::from_shared(request.snapshot, config);
            let result = engine.analyze(&request.scenario, &cancel);

            metrics
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .merge(engine.metrics());

            match result {
                Ok(mut analysis) => {
                    analysis.generation = generation;
                    if latest.load(Ordering::Acquire) != generation {
                        tracing::debug!(
                            "Generation {} finished after being superseded",
                            generation
                        );
                        return;
                    }
                    let analysis = Arc::new(analysis);
                    let published = slot.send_if_modified(|current| {
                        if current.as_ref().map_or(true, |a| a.generation < generation) {
                            *current = Some(Arc::clone(&analysis));
                            true
                        } else {
                            false
                        }
                    });
                    if published {
                        tracing::info!(
                            "Published generation {}: exposure {}",
                            generation,
                            analysis.report.total_expected_value
                        );
                    }
                }
                Err(EngineError::Cancelled) => {
                    tracing::debug!("Generation {} cancelled", generation);
                }
                Err(e) => {
                    tracing::error!("Generation {} failed: {}", generation, e);
                }
            }
        });

        self.tasks.push(handle);
        generation
    }

    /// Receiver that observes every published analysis
    pub fn subscribe(&self) -> watch::Receiver<AnalysisSlot> {
        self.slot.subscribe()
    }

    /// Most recently published analysis
    pub fn latest(&self) -> AnalysisSlot {
        self.slot.borrow().clone()
    }

    /// Generation of the most recent submission (0 before any)
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Cancel the computation in flight, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    /// Wait for every spawned computation to finish
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Worker`] if a computation panicked.
    pub async fn wait_idle(&mut self) -> Result<(), EngineError> {
        for handle in self.tasks.drain(..) {
            handle
                .await
                .map_err(|e| EngineError::Worker(format!("Recompute task failed: {}", e)))?;
        }
        Ok(())
    }

    /// Counters accumulated across every computation
    pub fn metrics(&self) -> EngineMetrics {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Reset metrics counters
    pub fn reset_metrics(&self) {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner).reset();
    }
}

impl Drop for RecomputeWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::{ClaimLineItem, EntityId, EntityRef, Fact, Link, LinkRole};
    use std::time::Duration;

    /// `claims` claims of `amount` each, every one backed by its own fact
    fn case_request(claims: u128, amount: u64) -> RecomputeRequest {
        let case = EntityId::from_value(1);
        let mut snapshot = CaseSnapshot::new(case);
        for i in 0..claims {
            let claim_id = EntityId::from_value(10_000 + i);
            let fact_id = EntityId::from_value(20_000 + i);
            snapshot.claims.push(ClaimLineItem::new(claim_id, case, "Wages", amount));
            snapshot.facts.push(Fact::new(fact_id, case, "Timesheets", 4));
            snapshot.links.push(Link::new(
                EntityId::from_value(30_000 + i),
                EntityRef::claim(claim_id),
                EntityRef::fact(fact_id),
                LinkRole::Evidence,
            ));
        }
        RecomputeRequest {
            snapshot: Arc::new(snapshot),
            scenario: ResolvedScenario::engine_defaults(),
        }
    }

    fn request(amount: u64) -> RecomputeRequest {
        case_request(1, amount)
    }

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = RecomputeWorker::default_config();
        assert_eq!(worker.generation(), 0);
        assert!(worker.latest().is_none());
        assert_eq!(worker.metrics().analyses, 0);
    }

    #[tokio::test]
    async fn test_publishes_result() {
        let mut worker = RecomputeWorker::new(EngineConfig::fast().with_seed(1));
        let mut updates = worker.subscribe();

        let generation = worker.submit(request(10_000));
        worker.wait_idle().await.unwrap();

        assert_eq!(generation, 1);
        assert!(updates.has_changed().unwrap());
        let latest = updates.borrow_and_update().clone().unwrap();
        assert_eq!(latest.generation, 1);
        assert_eq!(latest.report.per_claim.len(), 1);
        assert_eq!(worker.metrics().analyses, 1);
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let mut worker = RecomputeWorker::new(EngineConfig::default().with_seed(1));

        worker.submit(request(10_000));
        worker.submit(request(20_000));
        let last = worker.submit(request(30_000));
        worker.wait_idle().await.unwrap();

        let latest = worker.latest().unwrap();
        assert_eq!(latest.generation, last);
        assert_eq!(latest.report.per_claim[0].amount, 30_000);
    }

    #[tokio::test]
    async fn test_run_in_progress_is_cancelled() {
        let config = EngineConfig {
            samples: 100_000,
            ..EngineConfig::default().with_seed(4)
        };
        let mut worker = RecomputeWorker::new(config);

        // a thousand claims at this sample count keep the first run busy
        let first = worker.submit(case_request(1_000, 10_000));
        tokio::time::sleep(Duration::from_millis(20)).await;
        let last = worker.submit(request(30_000));
        worker.wait_idle().await.unwrap();

        let metrics = worker.metrics();
        assert!(metrics.cancelled_runs >= 1);
        assert_eq!(metrics.analyses, 1);

        let latest = worker.latest().unwrap();
        assert!(first < last);
        assert_eq!(latest.generation, last);
        assert_eq!(latest.report.per_claim.len(), 1);
        assert_eq!(latest.report.per_claim[0].amount, 30_000);
    }

    #[tokio::test]
    async fn test_resubmit_after_idle() {
        let mut worker = RecomputeWorker::new(EngineConfig::fast().with_seed(2));

        worker.submit(request(10_000));
        worker.wait_idle().await.unwrap();
        worker.submit(request(40_000));
        worker.wait_idle().await.unwrap();

        let latest = worker.latest().unwrap();
        assert_eq!(latest.generation, 2);
        assert_eq!(worker.metrics().analyses, 2);

        worker.reset_metrics();
        assert_eq!(worker.metrics().analyses, 0);
    }

    #[tokio::test]
    async fn test_cancel_without_work() {
        let mut worker = RecomputeWorker::default_config();
        worker.cancel();
        worker.wait_idle().await.unwrap();
        assert!(worker.latest().is_none());
    }
}
