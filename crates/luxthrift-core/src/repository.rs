//! Activity repository abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::{ActivityAction, ActivityEvent, ActorId, NewActivity};
use crate::tally::rank_by_count;

/// Ordering of `list` results by store-assigned time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recent first.
    #[default]
    NewestFirst,
    /// Insertion order.
    OldestFirst,
}

/// Predicate applied by `ActivityRepository::list`. Unset fields match all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Only events with this action.
    pub action: Option<ActivityAction>,
    /// Only events by this actor.
    pub actor: Option<ActorId>,
    /// Only events that reference a product.
    pub requires_product: bool,
    /// Only events that carry a category.
    pub requires_category: bool,
}

impl ActivityFilter {
    /// Returns `true` if `event` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, event: &ActivityEvent) -> bool {
        self.action.is_none_or(|action| event.action == action)
            && self.actor.as_ref().is_none_or(|actor| &event.actor == actor)
            && (!self.requires_product || event.product_id.is_some())
            && (!self.requires_category || event.category.is_some())
    }
}

/// A `list` request: filter, order and optional cap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityQuery {
    /// Which events to return.
    pub filter: ActivityFilter,
    /// Result ordering.
    pub order: SortOrder,
    /// Maximum number of events to return.
    pub limit: Option<usize>,
}

impl ActivityQuery {
    /// All events, most recent first.
    #[must_use]
    pub fn newest_first() -> Self {
        Self::default()
    }

    /// All events in insertion order.
    #[must_use]
    pub fn oldest_first() -> Self {
        Self {
            order: SortOrder::OldestFirst,
            ..Self::default()
        }
    }

    /// Restricts the query with `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: ActivityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Caps the number of returned events.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Grouping key of a `count_grouped` request. Events whose key field is
/// null are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Per product id.
    Product,
    /// Per category.
    Category,
    /// Per `(actor, category)` pair.
    ActorCategory,
}

/// A `count_grouped` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    /// What to group by.
    pub group_by: GroupKey,
    /// Which events to count.
    pub filter: ActivityFilter,
    /// Maximum number of groups to return.
    pub limit: Option<usize>,
}

impl CountQuery {
    /// Counts every event carrying the `group_by` key.
    #[must_use]
    pub fn new(group_by: GroupKey) -> Self {
        Self {
            group_by,
            filter: ActivityFilter::default(),
            limit: None,
        }
    }

    /// Restricts the counted events with `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: ActivityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Caps the number of returned groups.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Evaluates the query over `events`, which must be in insertion order.
    ///
    /// Stores that cannot group natively use this; results match the
    /// ordering contract of [`ActivityRepository::count_grouped`].
    #[must_use]
    pub fn apply(&self, events: &[ActivityEvent]) -> Vec<GroupedCount> {
        let keys = events
            .iter()
            .filter(|e| self.filter.matches(e))
            .filter_map(|e| self.key_of(e));

        let mut ranked: Vec<GroupedCount> = rank_by_count(keys)
            .into_iter()
            .map(|((actor, key), count)| GroupedCount { actor, key, count })
            .collect();
        if let Some(limit) = self.limit {
            ranked.truncate(limit);
        }
        ranked
    }

    fn key_of(&self, event: &ActivityEvent) -> Option<(Option<ActorId>, String)> {
        match self.group_by {
            GroupKey::Product => event.product_id.clone().map(|id| (None, id)),
            GroupKey::Category => event.category.clone().map(|c| (None, c)),
            GroupKey::ActorCategory => event
                .category
                .clone()
                .map(|c| (Some(event.actor.clone()), c)),
        }
    }
}

/// One row of a `count_grouped` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedCount {
    /// The actor, for `GroupKey::ActorCategory`; `None` otherwise.
    pub actor: Option<ActorId>,
    /// Product id or category.
    pub key: String,
    /// Number of matching events in the group.
    pub count: u64,
}

/// Append-only store of activity events.
///
/// Implementations assign `event_id`, `sequence` and `occurred_at` on
/// append. Stored events are never updated.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append one activity and return its stored form.
    async fn append(&self, activity: NewActivity) -> Result<ActivityEvent, DomainError>;

    /// List stored events matching `query`, ordered by `(occurred_at, sequence)`.
    async fn list(&self, query: &ActivityQuery) -> Result<Vec<ActivityEvent>, DomainError>;

    /// Total number of stored events.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Counts events matching `query.filter` per `query.group_by` key.
    ///
    /// Groups are ordered by count, highest first; equal counts are ordered
    /// by the group's earliest event. Grouping happens inside the store.
    async fn count_grouped(&self, query: &CountQuery) -> Result<Vec<GroupedCount>, DomainError>;
}
