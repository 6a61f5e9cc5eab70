//! `PostgreSQL` implementation of the `ActivityRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};
use uuid::Uuid;

use luxthrift_core::error::DomainError;
use luxthrift_core::event::{ActivityEvent, ActorId, NewActivity};
use luxthrift_core::repository::{
    ActivityFilter, ActivityQuery, ActivityRepository, CountQuery, GroupKey, GroupedCount, SortOrder,
};

use crate::schema::{ACTION_CHECK_CONSTRAINT, ACTIVITY_COLUMNS, SINGLE_ACTOR_CHECK_CONSTRAINT};

/// Raw `activity_events` row.
#[derive(Debug, FromRow)]
struct ActivityRow {
    sequence: i64,
    event_id: Uuid,
    user_id: Option<String>,
    guest_id: Option<String>,
    action: String,
    product_id: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    metadata: serde_json::Value,
    occurred_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for ActivityEvent {
    type Error = DomainError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let actor = match (row.user_id, row.guest_id) {
            (Some(user_id), None) => ActorId::Registered(user_id),
            (None, Some(guest_id)) => ActorId::Guest(guest_id),
            _ => {
                return Err(DomainError::Infrastructure(format!(
                    "activity row {} does not carry exactly one actor",
                    row.sequence
                )));
            }
        };
        let action = row.action.parse().map_err(|_| {
            DomainError::Infrastructure(format!(
                "activity row {} has unknown action {:?}",
                row.sequence, row.action
            ))
        })?;

        Ok(Self {
            event_id: row.event_id,
            sequence: row.sequence,
            actor,
            action,
            product_id: row.product_id,
            category: row.category,
            brand: row.brand,
            metadata: row.metadata,
            occurred_at: row.occurred_at,
        })
    }
}

/// One group of a `count_grouped` query.
#[derive(Debug, FromRow)]
struct GroupedRow {
    user_id: Option<String>,
    guest_id: Option<String>,
    group_key: String,
    event_count: i64,
}

impl TryFrom<GroupedRow> for GroupedCount {
    type Error = DomainError;

    fn try_from(row: GroupedRow) -> Result<Self, Self::Error> {
        let actor = match (row.user_id, row.guest_id) {
            (None, None) => None,
            (Some(user_id), None) => Some(ActorId::Registered(user_id)),
            (None, Some(guest_id)) => Some(ActorId::Guest(guest_id)),
            (Some(_), Some(_)) => {
                return Err(DomainError::Infrastructure(format!(
                    "group {:?} carries two actors",
                    row.group_key
                )));
            }
        };
        let count = u64::try_from(row.event_count)
            .map_err(|e| DomainError::Infrastructure(format!("negative group count: {e}")))?;

        Ok(Self {
            actor,
            key: row.group_key,
            count,
        })
    }
}

/// Appends ` AND …` clauses for every criterion set on `filter`.
fn push_filter<'args>(builder: &mut QueryBuilder<'args, Postgres>, filter: &'args ActivityFilter) {
    if let Some(action) = filter.action {
        builder.push(" AND action = ").push_bind(action.as_str());
    }
    match &filter.actor {
        Some(ActorId::Registered(user_id)) => {
            builder.push(" AND user_id = ").push_bind(user_id.as_str());
        }
        Some(ActorId::Guest(guest_id)) => {
            builder.push(" AND guest_id = ").push_bind(guest_id.as_str());
        }
        None => {}
    }
    if filter.requires_product {
        builder.push(" AND product_id IS NOT NULL");
    }
    if filter.requires_category {
        builder.push(" AND category IS NOT NULL");
    }
}

fn push_limit(builder: &mut QueryBuilder<'_, Postgres>, limit: Option<usize>) {
    if let Some(limit) = limit {
        builder
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
}

/// PostgreSQL-backed activity repository.
///
/// `sequence` comes from a `BIGSERIAL` and `occurred_at` from
/// `clock_timestamp()`, so ordering never depends on client clocks.
#[derive(Debug, Clone)]
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    /// Creates a new `PgActivityRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_append_error(err: sqlx::Error, action: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some(ACTION_CHECK_CONSTRAINT) => {
                return DomainError::InvalidEventKind(action.to_owned());
            }
            Some(SINGLE_ACTOR_CHECK_CONSTRAINT) => {
                return DomainError::Validation(
                    "exactly one of user id or guest id must be set".to_owned(),
                );
            }
            _ => {}
        }
    }
    DomainError::Infrastructure(err.to_string())
}

fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    #[instrument(skip(self, activity), fields(action = %activity.action))]
    async fn append(&self, activity: NewActivity) -> Result<ActivityEvent, DomainError> {
        let action = activity.action.as_str();
        let sql = format!(
            "INSERT INTO activity_events \
             (event_id, user_id, guest_id, action, product_id, category, brand, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ACTIVITY_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(activity.actor.user_id())
            .bind(activity.actor.guest_id())
            .bind(action)
            .bind(activity.product_id.as_deref())
            .bind(activity.category.as_deref())
            .bind(activity.brand.as_deref())
            .bind(&activity.metadata)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_append_error(e, action))?;

        debug!(sequence = row.sequence, "activity appended");
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ActivityQuery) -> Result<Vec<ActivityEvent>, DomainError> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_events WHERE TRUE"
        ));
        push_filter(&mut builder, &query.filter);
        builder.push(match query.order {
            SortOrder::NewestFirst => " ORDER BY occurred_at DESC, sequence DESC",
            SortOrder::OldestFirst => " ORDER BY occurred_at ASC, sequence ASC",
        });
        push_limit(&mut builder, query.limit);

        let rows = builder
            .build_query_as::<ActivityRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        rows.into_iter().map(ActivityEvent::try_from).collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_events")
            .fetch_one(&self.pool)
            .await
            .map_err(infrastructure)?;

        u64::try_from(count)
            .map_err(|e| DomainError::Infrastructure(format!("negative event count: {e}")))
    }

    #[instrument(skip(self))]
    async fn count_grouped(&self, query: &CountQuery) -> Result<Vec<GroupedCount>, DomainError> {
        let (select, key_column, group_by) = match query.group_by {
            GroupKey::Product => (
                "NULL::text AS user_id, NULL::text AS guest_id, product_id AS group_key",
                "product_id",
                "product_id",
            ),
            GroupKey::Category => (
                "NULL::text AS user_id, NULL::text AS guest_id, category AS group_key",
                "category",
                "category",
            ),
            GroupKey::ActorCategory => (
                "user_id, guest_id, category AS group_key",
                "category",
                "user_id, guest_id, category",
            ),
        };

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {select}, COUNT(*) AS event_count FROM activity_events \
             WHERE {key_column} IS NOT NULL"
        ));
        push_filter(&mut builder, &query.filter);
        builder.push(format!(
            " GROUP BY {group_by} ORDER BY COUNT(*) DESC, MIN(sequence) ASC"
        ));
        push_limit(&mut builder, query.limit);

        let rows = builder
            .build_query_as::<GroupedRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        rows.into_iter().map(GroupedCount::try_from).collect()
    }
}
