use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::quiz_dto::{QuestionDraft, QuizDraft};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::quiz::Quiz;

/// A quiz row together with its ordered question set.
#[derive(Debug, Clone)]
pub struct QuizRecord {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validates and persists a new quiz. The quiz row and all question
    /// rows are inserted in one transaction; validation failure aborts
    /// before anything is written.
    pub async fn create(&self, draft: QuizDraft) -> Result<QuizRecord> {
        let draft = validate_draft(draft)?;

        let mut tx = self.pool.begin().await?;
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"INSERT INTO quizzes (title, instructions) VALUES ($1, $2) RETURNING *"#,
        )
        .bind(&draft.title)
        .bind(&draft.instructions)
        .fetch_one(&mut *tx)
        .await?;

        let questions = insert_questions(&mut tx, quiz.id, &draft.questions).await?;
        tx.commit().await?;

        tracing::info!(quiz_id = %quiz.id, questions = questions.len(), "quiz created");
        Ok(QuizRecord { quiz, questions })
    }

    pub async fn get(&self, quiz_id: Uuid) -> Result<QuizRecord> {
        let quiz = sqlx::query_as::<_, Quiz>(r#"SELECT * FROM quizzes WHERE id = $1"#)
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))?;

        let questions = self.questions_for(quiz_id).await?;
        Ok(QuizRecord { quiz, questions })
    }

    pub async fn list(&self) -> Result<Vec<QuizRecord>> {
        let quizzes =
            sqlx::query_as::<_, Quiz>(r#"SELECT * FROM quizzes ORDER BY created_at DESC"#)
                .fetch_all(&self.pool)
                .await?;

        let mut records = Vec::with_capacity(quizzes.len());
        for quiz in quizzes {
            let questions = self.questions_for(quiz.id).await?;
            records.push(QuizRecord { quiz, questions });
        }
        Ok(records)
    }

    /// Full replace: the existing question set is deleted and the new
    /// set re-inserted with fresh 1-based positions, inside a single
    /// transaction so a mid-operation failure cannot strand a quiz with
    /// zero questions.
    pub async fn update(&self, quiz_id: Uuid, draft: QuizDraft) -> Result<QuizRecord> {
        let draft = validate_draft(draft)?;

        let mut tx = self.pool.begin().await?;
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"UPDATE quizzes SET title = $1, instructions = $2 WHERE id = $3 RETURNING *"#,
        )
        .bind(&draft.title)
        .bind(&draft.instructions)
        .bind(quiz_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))?;

        sqlx::query(r#"DELETE FROM questions WHERE quiz_id = $1"#)
            .bind(quiz_id)
            .execute(&mut *tx)
            .await?;

        let questions = insert_questions(&mut tx, quiz_id, &draft.questions).await?;
        tx.commit().await?;

        tracing::info!(quiz_id = %quiz.id, questions = questions.len(), "quiz replaced");
        Ok(QuizRecord { quiz, questions })
    }

    pub async fn delete(&self, quiz_id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"DELETE FROM quizzes WHERE id = $1"#)
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Quiz not found".to_string()));
        }
        Ok(())
    }

    pub async fn questions_for(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE quiz_id = $1 ORDER BY position ASC"#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }
}

async fn insert_questions(
    tx: &mut Transaction<'_, Postgres>,
    quiz_id: Uuid,
    drafts: &[QuestionDraft],
) -> Result<Vec<Question>> {
    let mut questions = Vec::with_capacity(drafts.len());
    for (idx, q) in drafts.iter().enumerate() {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (quiz_id, text, options, correct_ans, position)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(quiz_id)
        .bind(&q.text)
        .bind(Json(&q.options))
        .bind(&q.correct_ans)
        .bind(idx as i32 + 1)
        .fetch_one(&mut **tx)
        .await?;
        questions.push(question);
    }
    Ok(questions)
}

/// Single validation path for both authoring sources (manual form and
/// tabular import). Option strings are trimmed and blanks dropped
/// before the 2-4 option rule is applied; failure messages name the
/// offending question by its 1-based index.
pub fn validate_draft(mut draft: QuizDraft) -> Result<QuizDraft> {
    draft.title = draft.title.trim().to_string();
    draft.instructions = draft.instructions.trim().to_string();

    if draft.title.is_empty() || draft.instructions.is_empty() {
        return Err(Error::BadRequest(
            "Quiz title or instructions missing".to_string(),
        ));
    }

    for (idx, q) in draft.questions.iter_mut().enumerate() {
        let n = idx + 1;

        q.text = q.text.trim().to_string();
        if q.text.is_empty() {
            return Err(Error::BadRequest(format!("Question {} is missing text", n)));
        }

        q.options = q
            .options
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if q.options.len() < 2 {
            return Err(Error::BadRequest(format!(
                "Question {} must have at least 2 options",
                n
            )));
        }
        if q.options.len() > 4 {
            return Err(Error::BadRequest(format!(
                "Question {} must have at most 4 options",
                n
            )));
        }

        let mut seen = std::collections::HashSet::new();
        if !q.options.iter().all(|o| seen.insert(o.clone())) {
            return Err(Error::BadRequest(format!(
                "Question {} has duplicate options",
                n
            )));
        }

        q.correct_ans = q.correct_ans.trim().to_string();
        if q.correct_ans.is_empty() || !q.options.contains(&q.correct_ans) {
            return Err(Error::BadRequest(format!(
                "Question {} has invalid correct answer",
                n
            )));
        }
    }

    Ok(draft)
}
