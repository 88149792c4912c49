use std::collections::HashMap;

use crate::dto::quiz_dto::SubmitQuizResponse;
use crate::error::{Error, Result};
use crate::models::quiz::Quiz;
use crate::models::quiz_result::{QuizAnswer, QuizResult, QuizResultWithContext, QuizResultWithUser};
use crate::services::course_service::total_pages;
use crate::services::progress_service::ProgressService;
use crate::services::quiz_service::QuizService;
use crate::services::scoring_service::ScoringService;
use sqlx::PgPool;
use uuid::Uuid;

/// Score at or above which submitting a quiz also completes its lesson.
const AUTO_COMPLETE_SCORE: i32 = 70;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedResults<T> {
    #[serde(rename = "items")]
    pub results: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct QuizResultDetail {
    #[serde(flatten)]
    pub result: QuizResult,
    pub answers: Vec<QuizAnswer>,
}

#[derive(Clone)]
pub struct ResultService {
    pool: PgPool,
    quiz_service: QuizService,
    progress_service: ProgressService,
}

impl ResultService {
    pub fn new(pool: PgPool) -> Self {
        let quiz_service = QuizService::new(pool.clone());
        let progress_service = ProgressService::new(pool.clone());
        Self {
            pool,
            quiz_service,
            progress_service,
        }
    }

    /// Scores a submission and records it as a new immutable result row plus
    /// one answer row per answered question. Retakes insert fresh rows; past
    /// results are never updated. A passing score also marks the lesson
    /// completed.
    pub async fn submit_quiz(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
        answers: HashMap<Uuid, Uuid>,
    ) -> Result<SubmitQuizResponse> {
        let quiz: Quiz = self.quiz_service.get_by_id(quiz_id).await.map_err(|e| match e {
            Error::NotFound(_) => Error::NotFound("Quiz not found".to_string()),
            other => other,
        })?;
        let questions = self.quiz_service.questions_with_options(quiz_id).await?;

        let breakdown = ScoringService::score_quiz(&questions, &answers);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query_as::<_, QuizResult>(
            r#"
            INSERT INTO quiz_results (user_id, quiz_id, score)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .bind(breakdown.score)
        .fetch_one(&mut *tx)
        .await?;

        // Unanswered questions leave no trace.
        for question in &questions {
            if let Some(option_id) = answers.get(&question.id) {
                sqlx::query(
                    "INSERT INTO quiz_answers (quiz_result_id, question_id, option_id) VALUES ($1, $2, $3)",
                )
                .bind(result.id)
                .bind(question.id)
                .bind(option_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        let lesson_completed = breakdown.score >= AUTO_COMPLETE_SCORE;
        if lesson_completed {
            self.progress_service
                .mark_lesson_completed(user_id, quiz.lesson_id)
                .await?;
        }

        Ok(SubmitQuizResponse {
            result_id: result.id,
            score: breakdown.score,
            correct_count: breakdown.correct_count,
            total_questions: breakdown.total_questions,
            lesson_completed,
        })
    }

    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<PaginatedResults<QuizResultWithContext>> {
        let offset = (page - 1) * limit;
        let results = sqlx::query_as::<_, QuizResultWithContext>(
            r#"
            SELECT r.id, r.quiz_id, r.score, r.created_at,
                   l.title AS lesson_title, c.title AS course_title
            FROM quiz_results r
            JOIN quizzes q ON r.quiz_id = q.id
            JOIN lessons l ON q.lesson_id = l.id
            JOIN courses c ON l.course_id = c.id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_results WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(PaginatedResults {
            results,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    pub async fn list_by_quiz(
        &self,
        quiz_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<PaginatedResults<QuizResultWithUser>> {
        let offset = (page - 1) * limit;
        let results = sqlx::query_as::<_, QuizResultWithUser>(
            r#"
            SELECT r.id, r.user_id, r.score, r.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM quiz_results r
            JOIN users u ON r.user_id = u.id
            WHERE r.quiz_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(quiz_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_results WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(PaginatedResults {
            results,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    /// The caller's most recent attempt at a quiz, with its answer rows.
    pub async fn latest_result(
        &self,
        user_id: Uuid,
        quiz_id: Uuid,
    ) -> Result<Option<QuizResultDetail>> {
        let result = sqlx::query_as::<_, QuizResult>(
            r#"
            SELECT * FROM quiz_results
            WHERE user_id = $1 AND quiz_id = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(result) = result else {
            return Ok(None);
        };

        let answers = sqlx::query_as::<_, QuizAnswer>(
            "SELECT * FROM quiz_answers WHERE quiz_result_id = $1",
        )
        .bind(result.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuizResultDetail { result, answers }))
    }

    pub async fn get_result(&self, result_id: Uuid) -> Result<QuizResultDetail> {
        let result = sqlx::query_as::<_, QuizResult>("SELECT * FROM quiz_results WHERE id = $1")
            .bind(result_id)
            .fetch_one(&self.pool)
            .await?;

        let answers = sqlx::query_as::<_, QuizAnswer>(
            "SELECT * FROM quiz_answers WHERE quiz_result_id = $1",
        )
        .bind(result_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(QuizResultDetail { result, answers })
    }

    pub async fn delete_result(&self, result_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM quiz_results WHERE id = $1")
            .bind(result_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Quiz result not found".to_string()));
        }
        Ok(())
    }

    /// Drops every result the user has for quizzes inside one course, so the
    /// course can be retaken from scratch.
    pub async fn reset_for_course(&self, user_id: Uuid, course_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM quiz_results
            WHERE user_id = $1
              AND quiz_id IN (
                  SELECT q.id FROM quizzes q
                  JOIN lessons l ON q.lesson_id = l.id
                  WHERE l.course_id = $2
              )
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
