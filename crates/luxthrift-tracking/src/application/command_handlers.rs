//! Command handlers for the Activity Tracking context.
//!
//! Ingestion validates a raw submission, resolves the acting identity and
//! appends exactly one event to the durable store.

use luxthrift_core::command::Command;
use luxthrift_core::error::DomainError;
use luxthrift_core::event::{ActivityAction, ActivityEvent, ActorId, NewActivity, normalize_descriptor};
use luxthrift_core::repository::ActivityRepository;
use tracing::{info, instrument};

use crate::domain::commands::RecordActivity;

/// Longest accepted guest token.
pub const MAX_GUEST_ID_LEN: usize = 64;

fn resolve_actor(
    caller_user_id: Option<String>,
    guest_id: Option<String>,
) -> Result<ActorId, DomainError> {
    if let Some(user_id) = normalize_descriptor(caller_user_id) {
        return Ok(ActorId::Registered(user_id));
    }
    match normalize_descriptor(guest_id) {
        Some(guest_id) if guest_id.chars().count() > MAX_GUEST_ID_LEN => Err(
            DomainError::Validation(format!("guestId exceeds {MAX_GUEST_ID_LEN} characters")),
        ),
        Some(guest_id) => Ok(ActorId::Guest(guest_id)),
        None => Err(DomainError::Validation(
            "an actor is required: authenticate or supply guestId".to_owned(),
        )),
    }
}

fn validate_metadata(metadata: Option<serde_json::Value>) -> Result<serde_json::Value, DomainError> {
    match metadata {
        None | Some(serde_json::Value::Null) => Ok(serde_json::json!({})),
        Some(value @ serde_json::Value::Object(_)) => Ok(value),
        Some(_) => Err(DomainError::Validation(
            "metadata must be a JSON object".to_owned(),
        )),
    }
}

/// Validates a `RecordActivity` command into a `NewActivity`.
///
/// # Errors
///
/// Returns `DomainError::InvalidEventKind` for an action outside the closed
/// set and `DomainError::Validation` for a missing actor, an oversized guest
/// id or non-object metadata.
pub fn validate(command: &RecordActivity) -> Result<NewActivity, DomainError> {
    let action: ActivityAction = command.action.parse()?;
    let actor = resolve_actor(command.caller_user_id.clone(), command.guest_id.clone())?;
    let metadata = validate_metadata(command.metadata.clone())?;

    Ok(NewActivity {
        actor,
        action,
        product_id: normalize_descriptor(command.product_id.clone()),
        category: normalize_descriptor(command.category.clone()),
        brand: normalize_descriptor(command.brand.clone()),
        metadata,
    })
}

/// Handles the `RecordActivity` command: validates it and appends the
/// resulting event. Nothing is written when validation fails.
///
/// # Errors
///
/// Returns the validation errors of [`validate`] and
/// `DomainError::Infrastructure` if the append fails.
#[instrument(
    skip(command, repo),
    fields(command_type = command.command_type(), correlation_id = %command.correlation_id())
)]
pub async fn handle_record_activity(
    command: &RecordActivity,
    repo: &dyn ActivityRepository,
) -> Result<ActivityEvent, DomainError> {
    let activity = validate(command)?;
    let stored = repo.append(activity).await?;

    info!(
        event_id = %stored.event_id,
        action = %stored.action,
        sequence = stored.sequence,
        "activity recorded"
    );

    Ok(stored)
}
