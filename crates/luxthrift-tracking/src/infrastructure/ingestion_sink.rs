//! Sink that ingests captured activity in-process, for deployments where
//! the tracker and the activity store share a process.

use std::sync::Arc;

use async_trait::async_trait;
use luxthrift_core::error::DomainError;
use luxthrift_core::repository::ActivityRepository;
use uuid::Uuid;

use crate::application::capture::ActivitySink;
use crate::application::command_handlers::handle_record_activity;
use crate::domain::commands::RecordActivity;
use crate::domain::submission::ActivitySubmission;

/// Runs the ingestion handler directly against a repository.
#[derive(Clone)]
pub struct IngestionSink {
    repository: Arc<dyn ActivityRepository>,
}

impl IngestionSink {
    /// Creates a sink writing to `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn ActivityRepository>) -> Self {
        Self { repository }
    }
}

impl std::fmt::Debug for IngestionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionSink").finish_non_exhaustive()
    }
}

#[async_trait]
impl ActivitySink for IngestionSink {
    async fn submit(&self, submission: &ActivitySubmission) -> Result<(), DomainError> {
        let command = RecordActivity {
            correlation_id: Uuid::new_v4(),
            action: submission.action.as_str().to_owned(),
            caller_user_id: submission.actor.user_id().map(str::to_owned),
            guest_id: submission.actor.guest_id().map(str::to_owned),
            product_id: submission.product_id.clone(),
            category: submission.category.clone(),
            brand: submission.brand.clone(),
            metadata: Some(submission.metadata.clone()),
        };

        handle_record_activity(&command, self.repository.as_ref()).await?;
        Ok(())
    }
}
