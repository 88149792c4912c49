use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OptionInput {
    #[validate(length(min = 1, message = "Option text cannot be empty"))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 5, message = "Question text must be at least 5 characters"))]
    pub text: String,
    #[validate(length(min = 2, message = "A question needs at least 2 options"), nested)]
    pub options: Vec<OptionInput>,
}

/// Full quiz replacement payload: the lesson's quiz is rebuilt from this.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveQuizPayload {
    #[validate(length(min = 1, message = "A quiz needs at least one question"), nested)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    #[validate(length(min = 3, message = "Question text must be at least 3 characters"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 3, message = "Question text must be at least 3 characters"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOptionPayload {
    #[validate(length(min = 1, message = "Option text cannot be empty"))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOptionPayload {
    #[validate(length(min = 1, message = "Option text cannot be empty"))]
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetCorrectOptionsPayload {
    #[validate(length(min = 1, message = "At least one correct option is required"))]
    pub option_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuizRequest {
    /// question id -> chosen option id; unanswered questions are absent.
    pub answers: HashMap<Uuid, Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitQuizResponse {
    pub result_id: Uuid,
    pub score: i32,
    pub correct_count: i32,
    pub total_questions: i32,
    pub lesson_completed: bool,
}

/// Option as shown to a quiz taker; the correctness flag stays server-side.
#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub questions: Vec<QuestionView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_quiz_rejects_question_with_single_option() {
        let payload = SaveQuizPayload {
            questions: vec![QuestionInput {
                text: "Which helmet class is required on site?".into(),
                options: vec![OptionInput {
                    text: "Class A".into(),
                    is_correct: true,
                }],
            }],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn save_quiz_accepts_two_options() {
        let payload = SaveQuizPayload {
            questions: vec![QuestionInput {
                text: "Which helmet class is required on site?".into(),
                options: vec![
                    OptionInput {
                        text: "Class A".into(),
                        is_correct: true,
                    },
                    OptionInput {
                        text: "None".into(),
                        is_correct: false,
                    },
                ],
            }],
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn correct_options_payload_rejects_empty_set() {
        let payload = SetCorrectOptionsPayload { option_ids: vec![] };
        assert!(payload.validate().is_err());
    }
}
