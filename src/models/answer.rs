use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded answer. Not persisted on its own; lives inside the
/// serialized answer list of a `QuizAttempt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswer {
    pub question_id: Uuid,
    pub answer: String,
    #[serde(default)]
    pub time_spent: i64,
    pub timestamp: DateTime<Utc>,
}
