use std::collections::HashMap;

use crate::dto::admin_dto::{AdminMetrics, CourseAnalytics};
use crate::error::Result;
use crate::models::quiz_result::QuizResultWithContext;
use crate::services::course_service::CourseProgressEntry;
use crate::services::progress_service::{ProgressService, ProgressSummary};
use crate::services::scoring_service::ScoringService;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct UserDashboard {
    pub courses: Vec<CourseProgressEntry>,
    pub last_quiz_result: Option<QuizResultWithContext>,
    pub summary: ProgressSummary,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CourseLessonStatus {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub has_quiz: bool,
    pub is_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct UserCourseDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub lessons: Vec<CourseLessonStatus>,
}

#[derive(Clone)]
pub struct DashboardService {
    pool: PgPool,
    progress_service: ProgressService,
}

impl DashboardService {
    pub fn new(pool: PgPool) -> Self {
        let progress_service = ProgressService::new(pool.clone());
        Self {
            pool,
            progress_service,
        }
    }

    /// Employee landing view: every course with the caller's completion
    /// counts, the most recent quiz result, and overall totals.
    pub async fn user_dashboard(&self, user_id: Uuid) -> Result<UserDashboard> {
        let mut courses = sqlx::query_as::<_, CourseProgressEntry>(
            r#"
            SELECT c.id, c.title, c.description, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS total_lessons,
                   (SELECT COUNT(*)
                      FROM user_progress up
                      JOIN lessons l2 ON up.lesson_id = l2.id
                     WHERE l2.course_id = c.id AND up.user_id = $1) AS completed_lessons
            FROM courses c
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        for entry in &mut courses {
            entry.progress =
                ScoringService::percentage(entry.completed_lessons, entry.total_lessons);
        }

        let last_quiz_result = sqlx::query_as::<_, QuizResultWithContext>(
            r#"
            SELECT r.id, r.quiz_id, r.score, r.created_at,
                   l.title AS lesson_title, c.title AS course_title
            FROM quiz_results r
            JOIN quizzes q ON r.quiz_id = q.id
            JOIN lessons l ON q.lesson_id = l.id
            JOIN courses c ON l.course_id = c.id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let summary = self.progress_service.summary(user_id).await?;

        Ok(UserDashboard {
            courses,
            last_quiz_result,
            summary,
        })
    }

    /// One course for one user: lessons in order, flagged with quiz presence
    /// and the caller's completion state.
    pub async fn user_course_detail(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<UserCourseDetail> {
        #[derive(sqlx::FromRow)]
        struct CourseRow {
            id: Uuid,
            title: String,
            description: String,
            created_at: DateTime<Utc>,
        }

        let course = sqlx::query_as::<_, CourseRow>(
            "SELECT id, title, description, created_at FROM courses WHERE id = $1",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        let lessons = sqlx::query_as::<_, CourseLessonStatus>(
            r#"
            SELECT l.id, l.title, l.sort_order,
                   (q.id IS NOT NULL) AS has_quiz,
                   (up.id IS NOT NULL) AS is_completed
            FROM lessons l
            LEFT JOIN quizzes q ON q.lesson_id = l.id
            LEFT JOIN user_progress up ON up.lesson_id = l.id AND up.user_id = $2
            WHERE l.course_id = $1
            ORDER BY l.sort_order ASC
            "#,
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserCourseDetail {
            id: course.id,
            title: course.title,
            description: course.description,
            created_at: course.created_at,
            lessons,
        })
    }

    pub async fn admin_metrics(&self) -> Result<AdminMetrics> {
        let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let courses_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;
        let lessons_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(&self.pool)
            .await?;
        let quiz_results_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_results")
            .fetch_one(&self.pool)
            .await?;

        let average: f64 =
            sqlx::query_scalar("SELECT COALESCE(AVG(score::float8), 0) FROM quiz_results")
                .fetch_one(&self.pool)
                .await?;

        let role_rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT role, COUNT(*) FROM users GROUP BY role")
                .fetch_all(&self.pool)
                .await?;
        let users_by_role: HashMap<String, i64> = role_rows.into_iter().collect();

        Ok(AdminMetrics {
            users_count,
            courses_count,
            lessons_count,
            quiz_results_count,
            average_score: average.round() as i32,
            users_by_role,
        })
    }

    /// Per-course analytics: lesson total, how many users finished every
    /// lesson, mean quiz score, and the employee progress distribution.
    pub async fn course_analytics(&self, course_id: Uuid) -> Result<CourseAnalytics> {
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(crate::error::Error::NotFound("Course not found".to_string()));
        }

        let total_lessons: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(&self.pool)
                .await?;

        let counts = self
            .progress_service
            .completion_counts_by_user(course_id)
            .await?;

        let completed_course_count = if total_lessons > 0 {
            counts.iter().filter(|(_, c)| *c >= total_lessons).count() as i64
        } else {
            0
        };

        let average: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(AVG(r.score::float8), 0)
            FROM quiz_results r
            JOIN quizzes q ON r.quiz_id = q.id
            JOIN lessons l ON q.lesson_id = l.id
            WHERE l.course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        // Employees without a single progress row still belong in the 0%
        // bucket, so start from the full employee list.
        let employee_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE role = 'EMPLOYEE'")
                .fetch_all(&self.pool)
                .await?;
        let counts_map: HashMap<Uuid, i64> = counts.into_iter().collect();
        let per_employee = employee_ids
            .iter()
            .map(|id| counts_map.get(id).copied().unwrap_or(0));

        Ok(CourseAnalytics {
            total_lessons,
            completed_course_count,
            average_score: average.round() as i32,
            progress_distribution: ScoringService::distribution(total_lessons, per_employee),
        })
    }
}
