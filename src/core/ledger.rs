//! Resource ledger with Banker's-algorithm admission control.
//!
//! Each admitted pid holds an allocation and a declared maximum claim. A
//! request is granted only if the resulting state is safe, i.e. there is an
//! order in which every admitted pid could obtain its full claim and release
//! it. Refused requests leave the ledger exactly as it was.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Pid, ResourceVector, SimError};

/// Order in which admitted pids could run to completion.
pub type SafeSequence = Vec<Pid>;

/// Claim and current holding of one admitted pid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Declared maximum claim.
    pub max_need: ResourceVector,
    /// Resources currently held.
    pub allocation: ResourceVector,
}

/// Tracks available and allocated resource counts per admitted pid.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    total: ResourceVector,
    available: ResourceVector,
    entries: BTreeMap<Pid, LedgerEntry>,
}

impl ResourceLedger {
    /// Create a ledger whose whole capacity is initially available.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` for an empty capacity vector.
    pub fn new(capacity: impl Into<ResourceVector>) -> Result<Self, SimError> {
        let capacity = capacity.into();
        if capacity.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "available vector must not be empty".into(),
            ));
        }
        Ok(Self {
            total: capacity.clone(),
            available: capacity,
            entries: BTreeMap::new(),
        })
    }

    /// Number of resource types tracked.
    pub fn resource_types(&self) -> usize {
        self.total.len()
    }

    /// Fixed total capacity.
    pub const fn total(&self) -> &ResourceVector {
        &self.total
    }

    /// Resources not held by any pid.
    pub const fn available(&self) -> &ResourceVector {
        &self.available
    }

    /// Current holding of `pid`, if admitted.
    pub fn allocation(&self, pid: Pid) -> Option<&ResourceVector> {
        self.entries.get(&pid).map(|e| &e.allocation)
    }

    /// Recorded claim of `pid`, if admitted.
    pub fn max_need(&self, pid: Pid) -> Option<&ResourceVector> {
        self.entries.get(&pid).map(|e| &e.max_need)
    }

    /// Admitted pids in ascending order.
    pub fn admitted(&self) -> Vec<Pid> {
        self.entries.keys().copied().collect()
    }

    /// Check that `vector` describes as many resource types as the ledger.
    ///
    /// # Errors
    ///
    /// Returns `SimError::DimensionMismatch` on a length mismatch.
    pub fn check_dimensions(&self, vector: &ResourceVector) -> Result<(), SimError> {
        if vector.len() == self.total.len() {
            Ok(())
        } else {
            Err(SimError::DimensionMismatch {
                expected: self.total.len(),
                actual: vector.len(),
            })
        }
    }

    /// Try to grant `pid` its full claim.
    ///
    /// Returns the safe sequence on success and `None` when the grant is
    /// refused, either because the outstanding need exceeds what is available
    /// or because the resulting state would be unsafe. A refusal mutates
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `SimError::DimensionMismatch` if the claim has the wrong length.
    pub fn request(
        &mut self,
        pid: Pid,
        max_claim: &ResourceVector,
    ) -> Result<Option<SafeSequence>, SimError> {
        self.check_dimensions(max_claim)?;

        let prior = self.entries.get(&pid).cloned();
        let held = prior
            .as_ref()
            .map_or_else(|| ResourceVector::zeros(self.resource_types()), |e| e.allocation.clone());

        // A claim below the current holding cannot be expressed as a need.
        if !held.fits_within(max_claim)? {
            debug!(pid, claim = %max_claim, held = %held, "claim below current holding");
            return Ok(None);
        }

        let need = max_claim.checked_sub(&held)?;
        if !need.fits_within(&self.available)? {
            debug!(pid, need = %need, available = %self.available, "need exceeds available");
            return Ok(None);
        }

        let prior_available = self.available.clone();
        self.available = self.available.checked_sub(&need)?;
        self.entries.insert(
            pid,
            LedgerEntry {
                max_need: max_claim.clone(),
                allocation: held.checked_add(&need)?,
            },
        );

        if let Some(sequence) = self.safe_sequence()? {
            debug!(pid, ?sequence, available = %self.available, "grant committed");
            return Ok(Some(sequence));
        }

        self.available = prior_available;
        match prior {
            Some(entry) => {
                self.entries.insert(pid, entry);
            }
            None => {
                self.entries.remove(&pid);
            }
        }
        debug!(pid, "grant rolled back: unsafe state");
        Ok(None)
    }

    /// Return everything `pid` holds to the available pool and forget its
    /// claim. Releasing an unknown or already-released pid is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates vector arithmetic failures, which indicate a broken ledger.
    pub fn release(&mut self, pid: Pid) -> Result<Option<ResourceVector>, SimError> {
        let Some(entry) = self.entries.remove(&pid) else {
            return Ok(None);
        };
        self.available = self.available.checked_add(&entry.allocation)?;
        debug!(pid, freed = %entry.allocation, available = %self.available, "released");
        Ok(Some(entry.allocation))
    }

    /// Run the safety check against the current state.
    ///
    /// # Errors
    ///
    /// Propagates vector arithmetic failures.
    pub fn is_safe(&self) -> Result<bool, SimError> {
        Ok(self.safe_sequence()?.is_some())
    }

    /// True when available plus every allocation equals the total capacity.
    pub fn is_conserved(&self) -> bool {
        self.entries
            .values()
            .try_fold(self.available.clone(), |acc, e| acc.checked_add(&e.allocation))
            .is_ok_and(|sum| sum == self.total)
    }

    /// Find an order in which every admitted pid can finish, scanning pids in
    /// ascending order and repeating until a full pass makes no progress.
    fn safe_sequence(&self) -> Result<Option<SafeSequence>, SimError> {
        let mut work = self.available.clone();
        let mut finished = BTreeSet::new();
        let mut order = Vec::with_capacity(self.entries.len());

        loop {
            let mut progressed = false;
            for (&pid, entry) in &self.entries {
                if finished.contains(&pid) {
                    continue;
                }
                let need = entry.max_need.checked_sub(&entry.allocation)?;
                if need.fits_within(&work)? {
                    work = work.checked_add(&entry.allocation)?;
                    finished.insert(pid);
                    order.push(pid);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        trace!(finished = order.len(), admitted = self.entries.len(), "safety check");
        Ok((order.len() == self.entries.len()).then_some(order))
    }
}
