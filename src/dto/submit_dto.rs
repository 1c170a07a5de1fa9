use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::StudentAnswer;
use crate::models::attempt::QuizAttempt;
use crate::services::grading_service::{GradeOutcome, QuestionResult};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub student_id: String,
    pub answers: Option<Vec<StudentAnswer>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i64,
    pub no_questions: bool,
    pub details: Vec<QuestionResult>,
    pub attempt: QuizAttempt,
}

impl SubmitQuizResponse {
    pub fn from_outcome(outcome: GradeOutcome, attempt: QuizAttempt) -> Self {
        Self {
            score: outcome.score,
            total_questions: outcome.total_questions,
            percentage: outcome.percentage,
            no_questions: outcome.no_questions,
            details: outcome.details,
            attempt,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuizResponse {
    pub message: String,
    pub id: Uuid,
}
