use serde::Deserialize;

use crate::dto::quiz_dto::{QuestionDraft, QuizDraft};
use crate::error::{Error, Result};

/// One row of an uploaded tabular file. Quiz metadata is read from the
/// first row only; every row contributes one question.
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "Quiz Title", default)]
    quiz_title: Option<String>,
    #[serde(rename = "Quiz Instructions", default)]
    quiz_instructions: Option<String>,
    #[serde(rename = "Question Text", default)]
    question_text: Option<String>,
    #[serde(rename = "Option A", default)]
    option_a: Option<String>,
    #[serde(rename = "Option B", default)]
    option_b: Option<String>,
    #[serde(rename = "Option C", default)]
    option_c: Option<String>,
    #[serde(rename = "Option D", default)]
    option_d: Option<String>,
    #[serde(rename = "Correct Answer", default)]
    correct_answer: Option<String>,
}

pub struct ImportService;

impl ImportService {
    /// Converts uploaded CSV bytes into a quiz draft. Blank option
    /// cells are dropped here; everything else goes through the same
    /// `validate_draft` path as the manual form.
    pub fn draft_from_csv(bytes: &[u8]) -> Result<QuizDraft> {
        let mut reader = csv::Reader::from_reader(bytes);
        let mut rows: Vec<ImportRow> = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }

        if rows.is_empty() {
            return Err(Error::BadRequest(
                "The sheet is empty or improperly formatted".to_string(),
            ));
        }

        let title = rows[0]
            .quiz_title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled Quiz".to_string());
        let instructions = rows[0].quiz_instructions.clone().unwrap_or_default();

        let questions = rows
            .into_iter()
            .map(|row| QuestionDraft {
                text: row.question_text.unwrap_or_default(),
                options: [row.option_a, row.option_b, row.option_c, row.option_d]
                    .into_iter()
                    .flatten()
                    .filter(|o| !o.trim().is_empty())
                    .collect(),
                correct_ans: row.correct_answer.unwrap_or_default(),
            })
            .collect();

        Ok(QuizDraft {
            title,
            instructions,
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quiz_service::validate_draft;

    const HEADER: &str = "Quiz Title,Quiz Instructions,Question Text,Option A,Option B,Option C,Option D,Correct Answer";

    #[test]
    fn metadata_comes_from_first_row_only() {
        let csv = format!(
            "{}\n{}\n{}\n",
            HEADER,
            "Capitals,Answer all questions,Capital of France?,Paris,Lyon,Nice,,Paris",
            "Ignored Title,Ignored,Capital of Spain?,Madrid,Seville,,,Madrid"
        );
        let draft = ImportService::draft_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(draft.title, "Capitals");
        assert_eq!(draft.instructions, "Answer all questions");
        assert_eq!(draft.questions.len(), 2);
        assert_eq!(draft.questions[1].text, "Capital of Spain?");
    }

    #[test]
    fn blank_option_cells_are_filtered() {
        let csv = format!(
            "{}\n{}\n",
            HEADER, "T,I,Pick one,Yes,No,,,Yes"
        );
        let draft = ImportService::draft_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(draft.questions[0].options, vec!["Yes", "No"]);
        let validated = validate_draft(draft).unwrap();
        assert_eq!(validated.questions[0].correct_ans, "Yes");
    }

    #[test]
    fn empty_sheet_is_rejected() {
        let csv = format!("{}\n", HEADER);
        let err = ImportService::draft_from_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn mismatched_correct_answer_fails_validation_naming_question_one() {
        let csv = format!(
            "{}\n{}\n",
            HEADER, "T,I,Pick one,Yes,No,,,Maybe"
        );
        let draft = ImportService::draft_from_csv(csv.as_bytes()).unwrap();
        let err = validate_draft(draft).unwrap_err();
        assert_eq!(err.to_string(), "Question 1 has invalid correct answer");
    }

    #[test]
    fn missing_title_defaults_then_validation_catches_instructions() {
        let csv = format!(
            "{}\n{}\n",
            HEADER, ",,Pick one,Yes,No,,,Yes"
        );
        let draft = ImportService::draft_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(draft.title, "Untitled Quiz");
        assert!(validate_draft(draft).is_err());
    }
}
