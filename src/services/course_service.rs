use crate::dto::course_dto::{CreateCoursePayload, UpdateCoursePayload};
use crate::error::Result;
use crate::models::course::{Course, CourseWithLessonCount};
use crate::models::lesson::Lesson;
use crate::services::scoring_service::ScoringService;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedCourses {
    #[serde(rename = "items")]
    pub courses: Vec<CourseWithLessonCount>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct CourseProgressEntry {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_lessons: i64,
    pub completed_lessons: i64,
    // Not part of the row; computed from the two counts after fetch.
    #[sqlx(default)]
    pub progress: i32,
}

#[derive(Debug, serde::Serialize)]
pub struct PaginatedCourseProgress {
    #[serde(rename = "items")]
    pub courses: Vec<CourseProgressEntry>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit > 0 {
        (total as f64 / limit as f64).ceil() as i64
    } else {
        1
    }
}

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_course(&self, payload: CreateCoursePayload) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(payload.title)
        .bind(payload.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(course)
    }

    pub async fn update_course(&self, course_id: Uuid, payload: UpdateCoursePayload) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(payload.title)
        .bind(payload.description)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(course)
    }

    pub async fn delete_course(&self, course_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(crate::error::Error::NotFound("Course not found".to_string()));
        }
        Ok(())
    }

    pub async fn get_course(&self, course_id: Uuid) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(course)
    }

    pub async fn get_course_with_lessons(&self, course_id: Uuid) -> Result<(Course, Vec<Lesson>)> {
        let course = self.get_course(course_id).await?;
        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT * FROM lessons WHERE course_id = $1 ORDER BY sort_order ASC",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok((course, lessons))
    }

    pub async fn list_courses(
        &self,
        page: i64,
        limit: i64,
        search: Option<String>,
    ) -> Result<PaginatedCourses> {
        let offset = (page - 1) * limit;
        let search_param = search.map(|s| format!("%{}%", s));

        let courses = sqlx::query_as::<_, CourseWithLessonCount>(
            r#"
            SELECT c.*,
                   (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS lesson_count
            FROM courses c
            WHERE ($1::text IS NULL OR c.title ILIKE $1)
            ORDER BY c.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search_param.clone())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM courses WHERE ($1::text IS NULL OR title ILIKE $1)",
        )
        .bind(search_param)
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedCourses {
            courses,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    /// Catalog listing with the caller's completion counts folded in.
    pub async fn list_courses_with_progress(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
        search: Option<String>,
    ) -> Result<PaginatedCourseProgress> {
        let offset = (page - 1) * limit;
        let search_param = search.map(|s| format!("%{}%", s));

        let mut courses = sqlx::query_as::<_, CourseProgressEntry>(
            r#"
            SELECT c.id, c.title, c.description, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS total_lessons,
                   (SELECT COUNT(*)
                      FROM user_progress up
                      JOIN lessons l2 ON up.lesson_id = l2.id
                     WHERE l2.course_id = c.id AND up.user_id = $1) AS completed_lessons
            FROM courses c
            WHERE ($2::text IS NULL OR c.title ILIKE $2)
            ORDER BY c.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(search_param.clone())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        for entry in &mut courses {
            entry.progress =
                ScoringService::percentage(entry.completed_lessons, entry.total_lessons);
        }

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM courses WHERE ($1::text IS NULL OR title ILIKE $1)",
        )
        .bind(search_param)
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedCourseProgress {
            courses,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn total_pages_with_zero_limit_is_one() {
        assert_eq!(total_pages(42, 0), 1);
    }
}
