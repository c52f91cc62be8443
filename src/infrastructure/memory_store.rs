//! In-memory parameter repository
//!
//! Stands in for the network-backed datastore during development and tests.
//! Every operation can be delayed by a fixed amount plus random jitter to
//! reproduce the latency a real backend would add.

use async_trait::async_trait;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{
    application::parameter_store::ParameterRepository,
    domain::{OverarchingParameter, ParameterId},
    error::{Error, Result},
    infrastructure::log_messages,
};

/// Artificial delay applied before each repository operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub base: Duration,
    pub jitter: Duration,
}

impl SimulatedLatency {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fixed(base: Duration) -> Self {
        Self {
            base,
            jitter: Duration::ZERO,
        }
    }

    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// Base delay plus a uniform draw from `0..=jitter`
    pub fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let jitter_nanos = u64::try_from(self.jitter.as_nanos()).unwrap_or(u64::MAX);
        self.base + Duration::from_nanos(rand::thread_rng().gen_range(0..=jitter_nanos))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryParameterRepository {
    records: Arc<RwLock<BTreeMap<ParameterId, OverarchingParameter>>>,
    latency: SimulatedLatency,
}

impl InMemoryParameterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: SimulatedLatency) -> Self {
        Self {
            records: Arc::default(),
            latency,
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn simulate_latency(&self) {
        let delay = self.latency.sample();
        if !delay.is_zero() {
            debug!(delay_ms = whole_millis(delay), "{}", log_messages::parameters::SIMULATED_LATENCY);
            tokio::time::sleep(delay).await;
        }
    }
}

fn whole_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl ParameterRepository for InMemoryParameterRepository {
    #[instrument(skip(self))]
    async fn get(&self, id: ParameterId) -> Result<Option<OverarchingParameter>> {
        self.simulate_latency().await;
        Ok(self.records.read().await.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<OverarchingParameter>> {
        self.simulate_latency().await;
        Ok(self.records.read().await.values().cloned().collect())
    }

    #[instrument(skip(self, record), fields(id = %record.id()))]
    async fn create(&self, record: OverarchingParameter) -> Result<OverarchingParameter> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id()) {
            return Err(Error::conflict(format!("parameter {}", record.id())));
        }
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    #[instrument(skip(self, record), fields(id = %record.id()))]
    async fn update(&self, record: OverarchingParameter) -> Result<OverarchingParameter> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;
        match records.get_mut(&record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record)
            }
            None => Err(Error::not_found(format!("parameter {}", record.id()))),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ParameterId) -> Result<bool> {
        self.simulate_latency().await;
        Ok(self.records.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityDetails, ActivityCategory, Completeness, ParameterDraft};
    use chrono::Utc;

    fn record(draft: ParameterDraft) -> OverarchingParameter {
        let Completeness::Complete(inputs) = draft.classify().unwrap() else {
            panic!("draft should be complete");
        };
        OverarchingParameter::plan(
            ParameterId::generate(),
            ActivityDetails::parse("CSP01.A1", "Aden", ActivityCategory::Livelihoods).unwrap(),
            inputs,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let repo = InMemoryParameterRepository::new();
        let created = repo.create(record(ParameterDraft::new(6, 2, 101))).await.unwrap();

        let fetched = repo.get(created.id()).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let repo = InMemoryParameterRepository::new();
        let original = record(ParameterDraft::new(6, 2, 101));
        repo.create(original.clone()).await.unwrap();

        let result = repo.create(original).await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_requires_existing_record() {
        let repo = InMemoryParameterRepository::new();
        let result = repo.update(record(ParameterDraft::new(6, 2, 101))).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = InMemoryParameterRepository::new();
        let first = record(ParameterDraft::new(6, 2, 101));
        let second = record(ParameterDraft::new(9, 1, 87));
        repo.create(second.clone()).await.unwrap();
        repo.create(first.clone()).await.unwrap();

        let ids: Vec<_> = repo.list().await.unwrap().iter().map(|r| r.id()).collect();
        let mut expected = vec![first.id(), second.id()];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_delete_is_unconditional() {
        let repo = InMemoryParameterRepository::new();
        let created = repo.create(record(ParameterDraft::new(6, 2, 101))).await.unwrap();

        assert!(repo.delete(created.id()).await.unwrap());
        assert!(!repo.delete(created.id()).await.unwrap());
        assert_eq!(repo.get(created.id()).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_delays_operations() {
        let repo = InMemoryParameterRepository::with_latency(SimulatedLatency::fixed(
            Duration::from_millis(300),
        ));
        let started = tokio::time::Instant::now();
        repo.list().await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_logged_delay_saturates_instead_of_truncating() {
        assert_eq!(whole_millis(Duration::from_millis(250)), 250);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_latency_sample_stays_within_jitter() {
        let latency = SimulatedLatency::new(Duration::from_millis(100), Duration::from_millis(50));
        for _ in 0..100 {
            let sample = latency.sample();
            assert!(sample >= Duration::from_millis(100));
            assert!(sample <= Duration::from_millis(150));
        }
        assert_eq!(SimulatedLatency::none().sample(), Duration::ZERO);
    }
}
