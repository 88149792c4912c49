use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAnswer {
    pub id: Uuid,
    pub quiz_result_id: Uuid,
    pub question_id: Uuid,
    pub option_id: Uuid,
}

/// Result row joined with quiz/lesson/course titles for history listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResultWithContext {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub lesson_title: String,
    pub course_title: String,
}

/// Result row joined with the submitting user, for admin per-quiz listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResultWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}
