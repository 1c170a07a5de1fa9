use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question::Question;
use crate::services::quiz_service::QuizRecord;

/// Inbound quiz definition. Both the manual authoring form and the
/// tabular importer produce this same shape; validation happens once in
/// `quiz_service::validate_draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_ans: String,
}

/// Student-facing question view: correct answer excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
    pub order: i32,
}

impl From<Question> for QuestionView {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            options: q.options.0,
            order: q.position,
        }
    }
}

/// Authoring view: includes the correct answer. Only returned to callers
/// holding the author key, or as the echo of a create/update they sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAuthorView {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<String>,
    pub correct_ans: String,
    pub order: i32,
}

impl From<Question> for QuestionAuthorView {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            options: q.options.0,
            correct_ans: q.correct_ans,
            order: q.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionView>,
}

impl From<QuizRecord> for QuizView {
    fn from(record: QuizRecord) -> Self {
        let QuizRecord { quiz, questions } = record;
        Self {
            id: quiz.id,
            title: quiz.title,
            instructions: quiz.instructions,
            created_at: quiz.created_at,
            questions: questions.into_iter().map(QuestionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAuthorView {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionAuthorView>,
}

impl From<QuizRecord> for QuizAuthorView {
    fn from(record: QuizRecord) -> Self {
        let QuizRecord { quiz, questions } = record;
        Self {
            id: quiz.id,
            title: quiz.title,
            instructions: quiz.instructions,
            created_at: quiz.created_at,
            questions: questions
                .into_iter()
                .map(QuestionAuthorView::from)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetQuizQuery {
    #[serde(default)]
    pub include_answers: bool,
}
