//! Prometheus metrics for the DPoS core.
//!
//! The [`DposMetrics`] struct owns a dedicated [`Registry`] so an embedding
//! host can encode it into the Prometheus text exposition format alongside
//! its own metrics.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::event::DposEvent;

/// Central collection of all core-level Prometheus metrics.
pub struct DposMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub stakes: IntCounter,
    pub unstakes: IntCounter,
    pub elections: IntCounter,
    pub reward_distributions: IntCounter,
    pub reward_claims: IntCounter,
    pub data_submissions: IntCounter,
    pub data_verifications: IntCounter,
    /// Calls that returned an error and changed nothing.
    pub rejected_calls: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub validator_count: IntGauge,
    pub delegate_count: IntGauge,
    pub data_record_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Time spent inside one entry point, lock wait excluded, in milliseconds.
    pub call_time_ms: Histogram,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    register_int_counter_with_registry!(Opts::new(name, help), registry)
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge, prometheus::Error> {
    register_int_gauge_with_registry!(Opts::new(name, help), registry)
}

impl DposMetrics {
    /// Create a fresh set of metrics, all registered under a new [`Registry`].
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let stakes = counter(&registry, "autonomix_stakes_total", "Successful stake calls")?;
        let unstakes = counter(&registry, "autonomix_unstakes_total", "Successful unstake calls")?;
        let elections = counter(&registry, "autonomix_elections_total", "Successful elections")?;
        let reward_distributions = counter(
            &registry,
            "autonomix_reward_distributions_total",
            "Successful reward distributions",
        )?;
        let reward_claims =
            counter(&registry, "autonomix_reward_claims_total", "Successful reward claims")?;
        let data_submissions =
            counter(&registry, "autonomix_data_submissions_total", "Data records submitted")?;
        let data_verifications = counter(
            &registry,
            "autonomix_data_verifications_total",
            "Data records verified or rejected",
        )?;
        let rejected_calls = counter(
            &registry,
            "autonomix_rejected_calls_total",
            "Entry point calls that failed",
        )?;

        let validator_count = gauge(
            &registry,
            "autonomix_validator_count",
            "Size of the current validator set",
        )?;
        let delegate_count = gauge(&registry, "autonomix_delegate_count", "Registered delegates")?;
        let data_record_count =
            gauge(&registry, "autonomix_data_record_count", "Data records stored")?;

        // 0.01 ms → ~160 ms.
        let call_time_ms = register_histogram_with_registry!(
            HistogramOpts::new("autonomix_call_time_ms", "Entry point execution time in milliseconds")
                .buckets(prometheus::exponential_buckets(0.01, 2.0, 15)?),
            registry
        )?;

        Ok(Self {
            registry,
            stakes,
            unstakes,
            elections,
            reward_distributions,
            reward_claims,
            data_submissions,
            data_verifications,
            rejected_calls,
            validator_count,
            delegate_count,
            data_record_count,
            call_time_ms,
        })
    }

    /// Count an emitted event.
    pub fn observe(&self, event: &DposEvent) {
        match event {
            DposEvent::Staked { .. } => self.stakes.inc(),
            DposEvent::Unstaked { .. } => self.unstakes.inc(),
            DposEvent::ValidatorsElected { .. } => self.elections.inc(),
            DposEvent::RewardsDistributed { .. } => self.reward_distributions.inc(),
            DposEvent::RewardsClaimed { .. } => self.reward_claims.inc(),
            DposEvent::DataSubmitted { .. } => self.data_submissions.inc(),
            DposEvent::DataVerified { .. } => self.data_verifications.inc(),
            DposEvent::CandidateRegistered { .. }
            | DposEvent::VerifierRegistered { .. }
            | DposEvent::VerifierRemoved { .. } => {}
        }
    }

    pub fn set_sizes(&self, validators: usize, delegates: usize, records: usize) {
        self.validator_count.set(validators as i64);
        self.delegate_count.set(delegates as i64);
        self.data_record_count.set(records as i64);
    }

    /// Text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
