use crate::error::RegistryError;
use crate::metadata::DataMetadata;
use crate::policy::VerifierPolicy;
use crate::record::{DataRecord, DataStatus};
use autonomix_types::{Address, DataHash, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Append-only store of data records, plus the explicit verifier registry.
#[derive(Clone, Debug, Default)]
pub struct DataRegistry {
    records: HashMap<DataHash, DataRecord>,
    /// Submission order.
    order: Vec<DataHash>,
    verifiers: BTreeSet<Address>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRegistrySnapshot {
    /// In submission order.
    pub records: Vec<DataRecord>,
    pub verifiers: Vec<Address>,
}

impl DataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_submit(&self, data_hash: &DataHash, metadata: &DataMetadata) -> Result<(), RegistryError> {
        if data_hash.is_zero() {
            return Err(RegistryError::ZeroHash);
        }
        if self.records.contains_key(data_hash) {
            return Err(RegistryError::DuplicateSubmission(*data_hash));
        }
        metadata.validate()
    }

    /// Register a pending record.
    pub fn submit(
        &mut self,
        data_hash: DataHash,
        submitter: Address,
        metadata: DataMetadata,
        ipfs_hash: Option<String>,
        now: Timestamp,
    ) -> Result<&DataRecord, RegistryError> {
        self.check_submit(&data_hash, &metadata)?;
        let record = DataRecord {
            data_hash,
            submitter,
            metadata,
            ipfs_hash,
            submitted_at: now,
            status: DataStatus::Pending,
            verified_by: None,
            verified_at: None,
        };
        self.order.push(data_hash);
        tracing::debug!(%data_hash, %submitter, "data submitted");
        Ok(self.records.entry(data_hash).or_insert(record))
    }

    /// Whether `verifier` may decide records under `policy`.
    pub fn check_verifier(
        &self,
        policy: VerifierPolicy,
        verifier: &Address,
        is_elected: bool,
    ) -> Result<(), RegistryError> {
        if policy.permits(is_elected, self.verifiers.contains(verifier)) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized(*verifier))
        }
    }

    pub fn check_verify(&self, data_hash: &DataHash) -> Result<(), RegistryError> {
        let record = self
            .records
            .get(data_hash)
            .ok_or(RegistryError::NotFound(*data_hash))?;
        if record.status.is_decided() {
            return Err(RegistryError::AlreadyVerified {
                data_hash: *data_hash,
                status: record.status,
            });
        }
        Ok(())
    }

    /// Decide a pending record. Terminal: a second call always fails.
    ///
    /// Authorization is the caller's job, see [`check_verifier`](Self::check_verifier).
    pub fn verify(
        &mut self,
        data_hash: &DataHash,
        verifier: Address,
        valid: bool,
        now: Timestamp,
    ) -> Result<&DataRecord, RegistryError> {
        self.check_verify(data_hash)?;
        let record = self
            .records
            .get_mut(data_hash)
            .ok_or(RegistryError::NotFound(*data_hash))?;
        record.status = if valid {
            DataStatus::Verified
        } else {
            DataStatus::Rejected
        };
        record.verified_by = Some(verifier);
        record.verified_at = Some(now);
        tracing::info!(%data_hash, %verifier, status = %record.status, "data verified");
        Ok(record)
    }

    // ── Verifier registry ───────────────────────────────────────────────

    /// Returns `false` if already registered.
    pub fn register_verifier(&mut self, verifier: Address) -> bool {
        self.verifiers.insert(verifier)
    }

    /// Returns `false` if not registered.
    pub fn remove_verifier(&mut self, verifier: &Address) -> bool {
        self.verifiers.remove(verifier)
    }

    pub fn is_registered_verifier(&self, verifier: &Address) -> bool {
        self.verifiers.contains(verifier)
    }

    pub fn verifiers(&self) -> impl Iterator<Item = &Address> {
        self.verifiers.iter()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn get(&self, data_hash: &DataHash) -> Option<&DataRecord> {
        self.records.get(data_hash)
    }

    /// All records in submission order.
    pub fn all(&self) -> Vec<&DataRecord> {
        self.order.iter().filter_map(|h| self.records.get(h)).collect()
    }

    pub fn count(&self) -> usize {
        self.order.len()
    }

    pub fn pending(&self) -> Vec<&DataRecord> {
        self.all()
            .into_iter()
            .filter(|r| r.status == DataStatus::Pending)
            .collect()
    }

    pub fn by_submitter(&self, submitter: &Address) -> Vec<&DataRecord> {
        self.all()
            .into_iter()
            .filter(|r| r.submitter == *submitter)
            .collect()
    }

    pub fn count_by_status(&self, status: DataStatus) -> usize {
        self.records.values().filter(|r| r.status == status).count()
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> DataRegistrySnapshot {
        DataRegistrySnapshot {
            records: self.all().into_iter().cloned().collect(),
            verifiers: self.verifiers.iter().copied().collect(),
        }
    }

    /// Rebuild from a snapshot, rejecting duplicate hashes.
    pub fn restore(snapshot: DataRegistrySnapshot) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for record in snapshot.records {
            let hash = record.data_hash;
            if registry.records.insert(hash, record).is_some() {
                return Err(RegistryError::DuplicateSubmission(hash));
            }
            registry.order.push(hash);
        }
        registry.verifiers = snapshot.verifiers.into_iter().collect();
        Ok(registry)
    }
}
