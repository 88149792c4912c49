use crate::dto::lesson_dto::{
    CreateLessonPayload, LessonDetail, ReorderLessonsPayload, UpdateLessonPayload,
};
use crate::error::Result;
use crate::models::lesson::Lesson;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct LessonService {
    pool: PgPool,
}

impl LessonService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_lesson(
        &self,
        course_id: Uuid,
        payload: CreateLessonPayload,
    ) -> Result<Lesson> {
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(crate::error::Error::NotFound("Course not found".to_string()));
        }

        // Append after the last lesson when no explicit position is given.
        let sort_order = match payload.sort_order {
            Some(order) => order,
            None => {
                let last: Option<i32> = sqlx::query_scalar(
                    "SELECT MAX(sort_order) FROM lessons WHERE course_id = $1",
                )
                .bind(course_id)
                .fetch_one(&self.pool)
                .await?;
                last.unwrap_or(0) + 1
            }
        };

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (course_id, title, content, video_url, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(payload.title)
        .bind(payload.content)
        .bind(payload.video_url)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn update_lesson(
        &self,
        lesson_id: Uuid,
        payload: UpdateLessonPayload,
    ) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons
            SET title = COALESCE($1, title),
                content = COALESCE($2, content),
                video_url = COALESCE($3, video_url),
                sort_order = COALESCE($4, sort_order),
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(payload.title)
        .bind(payload.content)
        .bind(payload.video_url)
        .bind(payload.sort_order)
        .bind(lesson_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(lesson)
    }

    pub async fn delete_lesson(&self, lesson_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(crate::error::Error::NotFound("Lesson not found".to_string()));
        }
        Ok(())
    }

    /// Lesson with its course title, quiz id and the caller's completion
    /// timestamp, the shape the lesson page renders from.
    pub async fn get_detail(&self, lesson_id: Uuid, user_id: Uuid) -> Result<LessonDetail> {
        #[derive(sqlx::FromRow)]
        struct DetailRow {
            id: Uuid,
            course_id: Uuid,
            course_title: String,
            title: String,
            content: Option<String>,
            video_url: Option<String>,
            sort_order: i32,
            quiz_id: Option<Uuid>,
            completed_at: Option<chrono::DateTime<chrono::Utc>>,
        }

        let row = sqlx::query_as::<_, DetailRow>(
            r#"
            SELECT l.id, l.course_id, c.title AS course_title, l.title, l.content,
                   l.video_url, l.sort_order, q.id AS quiz_id, up.completed_at
            FROM lessons l
            JOIN courses c ON l.course_id = c.id
            LEFT JOIN quizzes q ON q.lesson_id = l.id
            LEFT JOIN user_progress up ON up.lesson_id = l.id AND up.user_id = $2
            WHERE l.id = $1
            "#,
        )
        .bind(lesson_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(LessonDetail {
            id: row.id,
            course_id: row.course_id,
            course_title: row.course_title,
            title: row.title,
            content: row.content,
            video_url: row.video_url,
            sort_order: row.sort_order,
            quiz_id: row.quiz_id,
            completed_at: row.completed_at,
        })
    }

    /// Rewrites lesson positions for a course in one transaction.
    pub async fn reorder(&self, course_id: Uuid, payload: ReorderLessonsPayload) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for item in &payload.lessons {
            let result = sqlx::query(
                "UPDATE lessons SET sort_order = $1, updated_at = NOW() WHERE id = $2 AND course_id = $3",
            )
            .bind(item.sort_order)
            .bind(item.id)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(crate::error::Error::BadRequest(format!(
                    "Lesson {} does not belong to this course",
                    item.id
                )));
            }
        }
        tx.commit().await?;
        Ok(())
    }
}
