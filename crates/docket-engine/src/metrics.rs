//! Metrics collection for engine computations

/// Counters accumulated across engine computations
///
/// Tracks scenario runs, draws, counterfactual candidates, and cancellations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineMetrics {
    /// Full scenario runs completed (baseline and counterfactual)
    pub scenario_runs: usize,

    /// Per-fact Monte Carlo draws performed
    pub samples_drawn: u64,

    /// Counterfactual candidates simulated
    pub candidates_evaluated: usize,

    /// Candidates dropped for a non-finite ROI
    pub candidates_discarded: usize,

    /// Computations abandoned because a newer request arrived
    pub cancelled_runs: usize,

    /// Complete analyses published
    pub analyses: usize,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed scenario run
    pub fn record_run(&mut self, draws: u64) {
        self.record_runs(1, draws);
    }

    /// Record several completed scenario runs
    pub fn record_runs(&mut self, runs: usize, draws: u64) {
        self.scenario_runs += runs;
        self.samples_drawn += draws;
    }

    /// Record an action ranking pass
    pub fn record_candidates(&mut self, evaluated: usize, discarded: usize) {
        self.candidates_evaluated += evaluated;
        self.candidates_discarded += discarded;
    }

    /// Record a cancelled computation
    pub fn record_cancellation(&mut self) {
        self.cancelled_runs += 1;
    }

    /// Record a complete analysis
    pub fn record_analysis(&mut self) {
        self.analyses += 1;
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &EngineMetrics) {
        self.scenario_runs += other.scenario_runs;
        self.samples_drawn += other.samples_drawn;
        self.candidates_evaluated += other.candidates_evaluated;
        self.candidates_discarded += other.candidates_discarded;
        self.cancelled_runs += other.cancelled_runs;
        self.analyses += other.analyses;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Engine Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Analyses: {}", self.analyses),
            format!("Scenario runs: {}", self.scenario_runs),
            format!("Samples drawn: {}", self.samples_drawn),
        ];

        if self.candidates_evaluated > 0 {
            lines.push(String::new());
            lines.push("Action candidates:".to_string());
            lines.push(format!("  Evaluated: {}", self.candidates_evaluated));
            lines.push(format!("  Discarded: {}", self.candidates_discarded));
        }

        if self.cancelled_runs > 0 {
            lines.push(String::new());
            lines.push(format!("Cancelled: {}", self.cancelled_runs));
        }

        lines.join("\n")
    }
}
