//! Single-writer service around [`DposState`].
//!
//! Every call takes the state lock, reads the clock, runs one entry point and
//! publishes its events, so calls are totally ordered and atomic with respect
//! to each other.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use autonomix_datashare::{DataMetadata, DataRecord};
use autonomix_token::TokenGateway;
use autonomix_types::{Address, Clock, DataHash, Timestamp, TokenAmount};
use tokio::sync::broadcast;

use crate::config::NodeConfig;
use crate::event::DposEvent;
use crate::metrics::DposMetrics;
use crate::snapshot::DposSnapshot;
use crate::state::DposState;
use crate::tracing_spans::{call_span, snapshot_span};
use crate::DposError;

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

pub struct DposService<G> {
    state: Mutex<DposState<G>>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<DposEvent>,
    metrics: DposMetrics,
}

impl<G: TokenGateway> DposService<G> {
    pub fn new(state: DposState<G>, clock: Arc<dyn Clock>) -> Result<Self, DposError> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let service = Self {
            state: Mutex::new(state),
            clock,
            events,
            metrics: DposMetrics::new()?,
        };
        service.refresh_gauges(&service.lock());
        Ok(service)
    }

    /// Fresh state whose election timer starts now.
    pub fn from_config(token: G, config: &NodeConfig, clock: Arc<dyn Clock>) -> Result<Self, DposError> {
        let genesis = clock.now();
        let state = DposState::new(token, config, genesis)?;
        tracing::info!(
            owner = %config.owner,
            custody = %config.custody,
            max_validators = config.params.max_validators,
            election_period_secs = config.params.election_period_secs,
            "dpos core started"
        );
        Self::new(state, clock)
    }

    /// Rebuild from bytes produced by [`snapshot_bytes`](Self::snapshot_bytes).
    pub fn restore(
        token: G,
        config: &NodeConfig,
        bytes: &[u8],
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DposError> {
        let _span = snapshot_span("restore").entered();
        let snapshot = DposSnapshot::from_bytes(bytes)?;
        let taken_at = snapshot.taken_at;
        let state = DposState::restore(token, config, snapshot)?;
        tracing::info!(%taken_at, "state restored from snapshot");
        Self::new(state, clock)
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<DposEvent> {
        self.events.subscribe()
    }

    pub fn metrics(&self) -> &DposMetrics {
        &self.metrics
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── Entry points ────────────────────────────────────────────────────

    pub fn stake(
        &self,
        caller: Address,
        delegate: Address,
        amount: TokenAmount,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.execute("stake", caller, |state, now| {
            state.stake(caller, delegate, amount, now)
        })
    }

    pub fn unstake(
        &self,
        caller: Address,
        delegate: Address,
        amount: TokenAmount,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.execute("unstake", caller, |state, now| {
            state.unstake(caller, delegate, amount, now)
        })
    }

    pub fn register_candidate(&self, caller: Address, delegate: Address) -> Result<Vec<DposEvent>, DposError> {
        self.execute("register_candidate", caller, |state, now| {
            state.register_candidate(caller, delegate, now)
        })
    }

    pub fn elect_validators(&self, caller: Address) -> Result<Vec<DposEvent>, DposError> {
        self.execute("elect_validators", caller, |state, now| {
            state.elect_validators(caller, now)
        })
    }

    pub fn distribute_rewards(&self, caller: Address) -> Result<Vec<DposEvent>, DposError> {
        self.execute("distribute_rewards", caller, |state, now| {
            state.distribute_rewards(caller, now)
        })
    }

    pub fn claim_rewards(&self, caller: Address) -> Result<Vec<DposEvent>, DposError> {
        self.execute("claim_rewards", caller, |state, now| {
            state.claim_rewards(caller, now)
        })
    }

    pub fn submit_data(
        &self,
        caller: Address,
        data_hash: DataHash,
        metadata: DataMetadata,
        ipfs_hash: Option<String>,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.execute("submit_data", caller, |state, now| {
            state.submit_data(caller, data_hash, metadata, ipfs_hash, now)
        })
    }

    /// Like [`submit_data`](Self::submit_data) with metadata as a JSON document.
    pub fn submit_data_json(
        &self,
        caller: Address,
        data_hash: DataHash,
        metadata_json: &str,
        ipfs_hash: Option<String>,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.execute("submit_data", caller, |state, now| {
            let metadata = DataMetadata::from_json(metadata_json)?;
            state.submit_data(caller, data_hash, metadata, ipfs_hash, now)
        })
    }

    pub fn verify_data(
        &self,
        caller: Address,
        data_hash: DataHash,
        valid: bool,
    ) -> Result<Vec<DposEvent>, DposError> {
        self.execute("verify_data", caller, |state, now| {
            state.verify_data(caller, data_hash, valid, now)
        })
    }

    pub fn register_verifier(&self, caller: Address, verifier: Address) -> Result<Vec<DposEvent>, DposError> {
        self.execute("register_verifier", caller, |state, _| {
            state.register_verifier(caller, verifier)
        })
    }

    pub fn remove_verifier(&self, caller: Address, verifier: Address) -> Result<Vec<DposEvent>, DposError> {
        self.execute("remove_verifier", caller, |state, _| {
            state.remove_verifier(caller, verifier)
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Run a read-only closure against a consistent view of the state.
    pub fn read<R>(&self, f: impl FnOnce(&DposState<G>) -> R) -> R {
        f(&self.lock())
    }

    /// The complete validator list, best ranked first.
    pub fn current_validators(&self) -> Vec<Address> {
        self.lock().current_validators()
    }

    pub fn delegate_total_staked(&self, delegate: &Address) -> TokenAmount {
        self.lock().delegate_total_staked(delegate)
    }

    pub fn delegator_stake(&self, delegate: &Address, delegator: &Address) -> TokenAmount {
        self.lock().delegator_stake(delegate, delegator)
    }

    pub fn data_record(&self, data_hash: &DataHash) -> Option<DataRecord> {
        self.lock().data_record(data_hash).cloned()
    }

    /// Every record in submission order.
    pub fn all_data(&self) -> Vec<DataRecord> {
        self.lock()
            .data_registry()
            .all()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn next_election_due(&self) -> Timestamp {
        self.lock().election().next_election_due()
    }

    pub fn seconds_until_election(&self) -> u64 {
        let now = self.clock.now();
        self.lock().election().seconds_until_due(now)
    }

    pub fn audit(&self) -> Result<(), DposError> {
        self.lock().audit()
    }

    pub fn snapshot(&self) -> DposSnapshot {
        let now = self.clock.now();
        self.lock().snapshot(now)
    }

    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, DposError> {
        let _span = snapshot_span("save").entered();
        self.snapshot().to_bytes()
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, DposState<G>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn execute<F>(&self, operation: &'static str, caller: Address, f: F) -> Result<Vec<DposEvent>, DposError>
    where
        F: FnOnce(&mut DposState<G>, Timestamp) -> Result<Vec<DposEvent>, DposError>,
    {
        let mut state = self.lock();
        let now = self.clock.now();
        let _span = call_span(operation, &caller, now).entered();
        let started = Instant::now();

        let result = f(&mut state, now);
        self.metrics
            .call_time_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);

        match &result {
            Ok(events) => {
                self.refresh_gauges(&state);
                for event in events {
                    self.metrics.observe(event);
                    // No subscribers is not an error.
                    let _ = self.events.send(event.clone());
                }
            }
            Err(e) => {
                self.metrics.rejected_calls.inc();
                tracing::warn!(error = %e, kind = ?e.kind(), "call rejected");
            }
        }
        result
    }

    fn refresh_gauges(&self, state: &DposState<G>) {
        self.metrics.set_sizes(
            state.election().validator_count(),
            state.stake_ledger().delegate_count(),
            state.data_registry().count(),
        );
    }
}
