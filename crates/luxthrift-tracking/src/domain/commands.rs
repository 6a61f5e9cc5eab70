//! Commands for the Activity Tracking context.

use luxthrift_core::command::Command;
use uuid::Uuid;

/// Ingest one activity submission into the durable store.
///
/// `action` is kept raw so the handler can reject values outside the closed
/// set with a proper error instead of a deserialization failure.
#[derive(Debug, Clone)]
pub struct RecordActivity {
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Action wire name, validated by the handler.
    pub action: String,
    /// Identity of the authenticated caller, if any.
    pub caller_user_id: Option<String>,
    /// Client-generated guest token for anonymous callers.
    pub guest_id: Option<String>,
    /// Product acted upon.
    pub product_id: Option<String>,
    /// Category at capture time.
    pub category: Option<String>,
    /// Brand at capture time.
    pub brand: Option<String>,
    /// Free-form payload; must be a JSON object when present.
    pub metadata: Option<serde_json::Value>,
}

impl Command for RecordActivity {
    fn command_type(&self) -> &'static str {
        "tracking.record_activity"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_activity_identifies_itself() {
        let correlation_id = Uuid::new_v4();
        let command = RecordActivity {
            correlation_id,
            action: "search".into(),
            caller_user_id: None,
            guest_id: Some("guest_1".into()),
            product_id: None,
            category: None,
            brand: None,
            metadata: None,
        };

        assert_eq!(command.command_type(), "tracking.record_activity");
        assert_eq!(command.correlation_id(), correlation_id);
    }
}
