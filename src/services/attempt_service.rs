use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::submit_dto::{SubmitQuizRequest, SubmitQuizResponse};
use crate::error::{Error, Result};
use crate::models::attempt::QuizAttempt;
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use crate::services::grading_service::GradingService;

#[derive(Clone)]
pub struct AttemptService {
    pool: PgPool,
}

impl AttemptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grades a submission and records it as the single attempt for
    /// (quiz, student). The upsert is atomic at the store; a
    /// resubmission overwrites the prior attempt's answers, score and
    /// end timestamp wholesale.
    pub async fn submit(&self, quiz_id: Uuid, req: SubmitQuizRequest) -> Result<SubmitQuizResponse> {
        let student_id = req.student_id.trim().to_string();
        let answers = match (student_id.is_empty(), req.answers) {
            (false, Some(answers)) => answers,
            _ => return Err(Error::BadRequest("Missing required fields".to_string())),
        };

        let quiz = sqlx::query_as::<_, Quiz>(r#"SELECT * FROM quizzes WHERE id = $1"#)
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))?;

        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE quiz_id = $1 ORDER BY position ASC"#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let outcome = GradingService::grade(&questions, &answers);
        let answers_json = serde_json::to_value(&answers)?;
        let now = Utc::now();

        let attempt = sqlx::query_as::<_, QuizAttempt>(
            r#"
            INSERT INTO quiz_attempts (quiz_id, student_id, answers, score, completed, started_at, ended_at)
            VALUES ($1, $2, $3, $4, TRUE, $5, $5)
            ON CONFLICT (quiz_id, student_id) DO UPDATE
            SET answers = EXCLUDED.answers,
                score = EXCLUDED.score,
                completed = TRUE,
                ended_at = EXCLUDED.ended_at
            RETURNING *
            "#,
        )
        .bind(quiz_id)
        .bind(&student_id)
        .bind(&answers_json)
        .bind(outcome.score)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            quiz_id = %quiz.id,
            student_id = %student_id,
            score = outcome.score,
            total = outcome.total_questions,
            "attempt recorded"
        );

        Ok(SubmitQuizResponse::from_outcome(outcome, attempt))
    }

    pub async fn list_for_quiz(&self, quiz_id: Uuid) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(
            r#"SELECT * FROM quiz_attempts WHERE quiz_id = $1 ORDER BY ended_at DESC NULLS LAST"#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }
}
