//! Long-lived owner of the snapshot store, subscriptions and retry state.
//!
//! A [`Monitor`] is fed snapshots as they are fetched. The first snapshot of a
//! document becomes its baseline; every later one is compared against the
//! newest retained snapshot with [`run_cycle`]. The store only advances after
//! a successful cycle, so a failed comparison is retried against the same
//! baseline next time. After `max_consecutive_failures` failures in a row the
//! document is suspended until [`Monitor::reset`].

use std::collections::HashMap;
use std::sync::Arc;

use canonical::ParserPool;
use matcher::MatchOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::pipeline::{run_cycle, CycleConfig, CycleReport, Subscription};
use crate::snapshot::{Snapshot, SnapshotKey, SnapshotStore};
use crate::PipelineError;

/// Bounded-retry policy for failing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorPolicy {
    pub max_consecutive_failures: u32,
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 3,
        }
    }
}

/// What [`Monitor::observe`] did with a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// First snapshot of the document; nothing to compare against yet.
    Baseline,
    Compared(CycleReport),
    /// Fetched before the newest retained snapshot. Kept if it fits the two
    /// slots, never compared.
    Stale,
    /// The document has failed too often and is ignored until reset.
    Suspended { failures: u32 },
}

pub struct Monitor {
    store: SnapshotStore,
    subscriptions: HashMap<SnapshotKey, Vec<Subscription>>,
    faults: HashMap<SnapshotKey, u32>,
    pool: Arc<ParserPool>,
    cycle: CycleConfig,
    policy: MonitorPolicy,
}

impl Monitor {
    pub fn new(pool: Arc<ParserPool>, cycle: CycleConfig, policy: MonitorPolicy) -> Self {
        Self {
            store: SnapshotStore::new(),
            subscriptions: HashMap::new(),
            faults: HashMap::new(),
            pool,
            cycle,
            policy,
        }
    }

    /// Build the parser pool and runtime settings described by `config`.
    pub fn from_config(config: &WatchConfig) -> Result<Self, PipelineError> {
        let pool = ParserPool::new(config.pool.size)?;
        Ok(Self::new(
            Arc::new(pool),
            config.cycle_config(),
            config.monitor_policy(),
        ))
    }

    pub fn subscribe(&mut self, key: SnapshotKey, subscription: Subscription) {
        self.subscriptions.entry(key).or_default().push(subscription);
    }

    /// Build `phrases` into keywords with a pooled parser and the cycle's
    /// tokenize options, then subscribe.
    pub fn subscribe_phrases<I, S>(
        &mut self,
        key: SnapshotKey,
        id: impl Into<String>,
        phrases: I,
        options: MatchOptions,
    ) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let subscription = {
            let parser = self.pool.acquire(self.cycle.acquire_timeout)?;
            Subscription::build(id, phrases, &*parser, &self.cycle.tokenize, options)?
        };
        self.subscribe(key, subscription);
        Ok(())
    }

    /// Drop the subscription `id` for `key`. Returns whether one was removed.
    pub fn unsubscribe(&mut self, key: &SnapshotKey, id: &str) -> bool {
        let Some(subscriptions) = self.subscriptions.get_mut(key) else {
            return false;
        };
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        before != subscriptions.len()
    }

    pub fn subscriptions(&self, key: &SnapshotKey) -> &[Subscription] {
        self.subscriptions
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Feed one freshly fetched snapshot.
    ///
    /// # Errors
    ///
    /// Any [`PipelineError`] from the comparison. The failure is counted
    /// against the document and the retained snapshots are left untouched.
    pub fn observe(&mut self, snapshot: Snapshot) -> Result<Observation, PipelineError> {
        let key = snapshot.key().clone();

        if self.is_suspended(&key) {
            let failures = self.failures(&key);
            debug!(document = %key, failures, "observe_suspended");
            return Ok(Observation::Suspended { failures });
        }

        let latest = match self.store.latest(&key) {
            Some(latest) => latest,
            None => {
                info!(document = %key, hash = %snapshot.content_hash(), "baseline_recorded");
                self.store.record(snapshot);
                return Ok(Observation::Baseline);
            }
        };

        if snapshot.fetched_at() < latest.fetched_at() {
            debug!(document = %key, fetched_at = %snapshot.fetched_at(), "stale_snapshot");
            self.store.record(snapshot);
            return Ok(Observation::Stale);
        }

        let subscriptions = self
            .subscriptions
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match run_cycle(&self.pool, latest, &snapshot, subscriptions, &self.cycle) {
            Ok(report) => {
                self.faults.remove(&key);
                self.store.record(snapshot);
                Ok(Observation::Compared(report))
            }
            Err(err) => {
                let failures = self.faults.entry(key.clone()).or_insert(0);
                *failures += 1;
                let failures = *failures;
                if failures >= self.policy.max_consecutive_failures {
                    warn!(document = %key, failures, error = %err, "document_suspended");
                } else {
                    warn!(document = %key, failures, error = %err, "observe_failure");
                }
                Err(err)
            }
        }
    }

    /// Consecutive failed cycles for `key`.
    pub fn failures(&self, key: &SnapshotKey) -> u32 {
        self.faults.get(key).copied().unwrap_or(0)
    }

    pub fn is_suspended(&self, key: &SnapshotKey) -> bool {
        self.failures(key) >= self.policy.max_consecutive_failures
    }

    /// Clear the failure count, lifting a suspension.
    pub fn reset(&mut self, key: &SnapshotKey) {
        self.faults.remove(key);
    }

    /// Forget a document entirely: snapshots, subscriptions and faults.
    pub fn forget(&mut self, key: &SnapshotKey) {
        self.store.remove(key);
        self.subscriptions.remove(key);
        self.faults.remove(key);
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn policy(&self) -> MonitorPolicy {
        self.policy
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("documents", &self.store.len())
            .field("subscribed", &self.subscriptions.len())
            .field("faulted", &self.faults.len())
            .field("policy", &self.policy)
            .finish()
    }
}
