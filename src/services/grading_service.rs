use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::answer::StudentAnswer;
use crate::models::question::Question;

/// Per-question grading detail. This is the only place correct answers
/// are exposed to the student, and only after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    pub student_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeOutcome {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i64,
    /// Set when the quiz has no questions; percentage is pinned to 0
    /// instead of dividing by zero.
    pub no_questions: bool,
    pub details: Vec<QuestionResult>,
}

pub struct GradingService;

impl GradingService {
    /// Grades a submission against the full question set. Matching is
    /// exact, case-sensitive string equality; no partial credit. A
    /// student who answered fewer questions than exist is still scored
    /// against every question.
    pub fn grade(questions: &[Question], answers: &[StudentAnswer]) -> GradeOutcome {
        let total_questions = questions.len() as i32;
        let mut score: i32 = 0;
        let mut details: Vec<QuestionResult> = Vec::with_capacity(questions.len());

        for q in questions {
            let submitted = answers.iter().find(|a| a.question_id == q.id);
            let is_correct = submitted.map(|a| a.answer == q.correct_ans).unwrap_or(false);
            if is_correct {
                score += 1;
            }

            details.push(QuestionResult {
                question_id: q.id,
                question: q.text.clone(),
                options: q.options.0.clone(),
                student_answer: submitted.map(|a| a.answer.clone()),
                correct_answer: q.correct_ans.clone(),
                is_correct,
            });
        }

        let no_questions = total_questions == 0;
        let percentage = if no_questions {
            0
        } else {
            ((score as f64 / total_questions as f64) * 100.0).round() as i64
        };

        GradeOutcome {
            score,
            total_questions,
            percentage,
            no_questions,
            details,
        }
    }
}
