use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted multiple-choice question. `position` is the 1-based,
/// contiguous slot inside the owning quiz; `correct_ans` must equal one
/// of `options` (enforced at validation time).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub text: String,
    pub options: Json<Vec<String>>,
    pub correct_ans: String,
    pub position: i32,
}
