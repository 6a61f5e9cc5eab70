//! Test repositories: `ActivityRepository` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use luxthrift_core::clock::Clock;
use luxthrift_core::error::DomainError;
use luxthrift_core::event::{ActivityEvent, NewActivity};
use luxthrift_core::repository::{
    ActivityQuery, ActivityRepository, CountQuery, GroupedCount, SortOrder,
};
use uuid::Uuid;

use crate::clock::SteppingClock;

/// A fully functional in-memory activity store. Timestamps come from the
/// injected clock; sequence numbers start at 1.
pub struct InMemoryActivityRepository {
    clock: Box<dyn Clock>,
    events: Mutex<Vec<ActivityEvent>>,
}

impl std::fmt::Debug for InMemoryActivityRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryActivityRepository")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl InMemoryActivityRepository {
    /// Creates an empty store driven by a `SteppingClock`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Box::new(SteppingClock::default()))
    }

    /// Creates an empty store driven by `clock`.
    #[must_use]
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every stored event in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn stored_events(&self) -> Vec<ActivityEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Default for InMemoryActivityRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn append(&self, activity: NewActivity) -> Result<ActivityEvent, DomainError> {
        let mut events = self.events.lock().unwrap();
        let sequence = i64::try_from(events.len()).unwrap_or(i64::MAX) + 1;
        let event = ActivityEvent::from_new(activity, Uuid::now_v7(), sequence, self.clock.now());
        events.push(event.clone());
        Ok(event)
    }

    async fn list(&self, query: &ActivityQuery) -> Result<Vec<ActivityEvent>, DomainError> {
        let mut matched: Vec<ActivityEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| query.filter.matches(e))
            .cloned()
            .collect();

        matched.sort_by_key(|e| (e.occurred_at, e.sequence));
        if query.order == SortOrder::NewestFirst {
            matched.reverse();
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.events.lock().unwrap().len() as u64)
    }

    async fn count_grouped(&self, query: &CountQuery) -> Result<Vec<GroupedCount>, DomainError> {
        let mut events = self.events.lock().unwrap().clone();
        events.sort_by_key(|e| (e.occurred_at, e.sequence));
        Ok(query.apply(&events))
    }
}

/// An activity repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingActivityRepository;

#[async_trait]
impl ActivityRepository for FailingActivityRepository {
    async fn append(&self, _activity: NewActivity) -> Result<ActivityEvent, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list(&self, _query: &ActivityQuery) -> Result<Vec<ActivityEvent>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn count_grouped(&self, _query: &CountQuery) -> Result<Vec<GroupedCount>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
