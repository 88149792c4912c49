use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLessonPayload {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "super::trim_optional_string")]
    #[validate(url(message = "Video reference must be a valid URL"))]
    pub video_url: Option<String>,
    /// Position within the course; appended after the last lesson when absent.
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLessonPayload {
    #[serde(default, deserialize_with = "super::trim_optional_string")]
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "super::trim_optional_string")]
    #[validate(url(message = "Video reference must be a valid URL"))]
    pub video_url: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonOrderItem {
    pub id: Uuid,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderLessonsPayload {
    #[validate(length(min = 1, message = "At least one lesson is required"))]
    pub lessons: Vec<LessonOrderItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonDetail {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: String,
    pub title: String,
    pub content: Option<String>,
    pub video_url: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub quiz_id: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
}
