use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRolePayload {
    pub role: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminMetrics {
    pub users_count: i64,
    pub courses_count: i64,
    pub lessons_count: i64,
    pub quiz_results_count: i64,
    pub average_score: i32,
    pub users_by_role: HashMap<String, i64>,
}

/// Per-course employee buckets keyed on completion percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressDistribution {
    pub zero: i64,
    pub in_progress: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseAnalytics {
    pub total_lessons: i64,
    pub completed_course_count: i64,
    pub average_score: i32,
    pub progress_distribution: ProgressDistribution,
}
