use crate::error::Result;
use crate::models::progress::UserProgress;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSummary {
    pub completed_lessons: i64,
    pub active_courses: i64,
}

#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
}

impl ProgressService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent completion upsert: a repeated call refreshes the timestamp
    /// on the existing (user, lesson) row instead of erroring.
    pub async fn mark_lesson_completed(
        &self,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<UserProgress> {
        // Surface a 404 for dangling lesson ids instead of an FK violation.
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(crate::error::Error::NotFound("Lesson not found".to_string()));
        }

        let progress = sqlx::query_as::<_, UserProgress>(
            r#"
            INSERT INTO user_progress (user_id, lesson_id, completed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, lesson_id) DO UPDATE SET completed_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(progress)
    }

    /// Completed-lesson counts per user for one course, for the aggregator.
    /// Users with no progress rows are absent from the result.
    pub async fn completion_counts_by_user(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<(Uuid, i64)>> {
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT up.user_id, COUNT(up.lesson_id)
            FROM user_progress up
            JOIN lessons l ON up.lesson_id = l.id
            WHERE l.course_id = $1
            GROUP BY up.user_id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<ProgressSummary> {
        let completed_lessons: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_progress WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let active_courses: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT l.course_id)
            FROM user_progress up
            JOIN lessons l ON up.lesson_id = l.id
            WHERE up.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProgressSummary {
            completed_lessons,
            active_courses,
        })
    }
}
