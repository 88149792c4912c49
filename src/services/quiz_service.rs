use crate::dto::quiz_dto::{
    CreateOptionPayload, CreateQuestionPayload, OptionView, QuestionView, QuizView,
    SaveQuizPayload, SetCorrectOptionsPayload, UpdateOptionPayload, UpdateQuestionPayload,
};
use crate::error::{Error, Result};
use crate::models::quiz::{Question, QuestionOption, QuestionWithOptions, Quiz};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, quiz_id: Uuid) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(quiz)
    }

    pub async fn get_by_lesson(&self, lesson_id: Uuid) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE lesson_id = $1")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(quiz)
    }

    /// Questions in creation order, each with all its options. This is the
    /// input shape the scoring engine consumes; correctness flags included.
    pub async fn questions_with_options(&self, quiz_id: Uuid) -> Result<Vec<QuestionWithOptions>> {
        // Questions saved in one transaction share a created_at; the id
        // tiebreak keeps the order stable between reads.
        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE quiz_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        let options = sqlx::query_as::<_, QuestionOption>(
            "SELECT * FROM options WHERE question_id = ANY($1) ORDER BY id",
        )
        .bind(&question_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions
            .into_iter()
            .map(|q| {
                let opts = options
                    .iter()
                    .filter(|o| o.question_id == q.id)
                    .cloned()
                    .collect();
                QuestionWithOptions {
                    id: q.id,
                    quiz_id: q.quiz_id,
                    text: q.text,
                    options: opts,
                }
            })
            .collect())
    }

    /// Quiz as served to a quiz taker, correctness flags stripped.
    pub async fn taker_view(&self, lesson_id: Uuid) -> Result<QuizView> {
        let quiz = self
            .get_by_lesson(lesson_id)
            .await?
            .ok_or_else(|| Error::NotFound("This lesson has no quiz".to_string()))?;
        let questions = self.questions_with_options(quiz.id).await?;

        Ok(QuizView {
            id: quiz.id,
            lesson_id: quiz.lesson_id,
            questions: questions
                .into_iter()
                .map(|q| QuestionView {
                    id: q.id,
                    text: q.text,
                    options: q
                        .options
                        .into_iter()
                        .map(|o| OptionView {
                            id: o.id,
                            text: o.text,
                        })
                        .collect(),
                })
                .collect(),
        })
    }

    /// Replaces the lesson's quiz content wholesale: existing questions (and
    /// their options, via cascade) are dropped and the payload is inserted,
    /// all inside one transaction.
    pub async fn save_quiz(&self, lesson_id: Uuid, payload: SaveQuizPayload) -> Result<Quiz> {
        for question in &payload.questions {
            if !question.options.iter().any(|o| o.is_correct) {
                return Err(Error::BadRequest(format!(
                    "Question '{}' has no correct option",
                    question.text
                )));
            }
        }

        let lesson_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;
        if lesson_exists.is_none() {
            return Err(Error::NotFound("Lesson not found".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE lesson_id = $1")
            .bind(lesson_id)
            .fetch_optional(&mut *tx)
            .await?;

        let quiz = match existing {
            Some(quiz) => {
                sqlx::query("DELETE FROM questions WHERE quiz_id = $1")
                    .bind(quiz.id)
                    .execute(&mut *tx)
                    .await?;
                quiz
            }
            None => {
                sqlx::query_as::<_, Quiz>(
                    "INSERT INTO quizzes (lesson_id) VALUES ($1) RETURNING *",
                )
                .bind(lesson_id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        for question in &payload.questions {
            let question_id: Uuid = sqlx::query_scalar(
                "INSERT INTO questions (quiz_id, text) VALUES ($1, $2) RETURNING id",
            )
            .bind(quiz.id)
            .bind(&question.text)
            .fetch_one(&mut *tx)
            .await?;

            for option in &question.options {
                sqlx::query("INSERT INTO options (question_id, text, is_correct) VALUES ($1, $2, $3)")
                    .bind(question_id)
                    .bind(&option.text)
                    .bind(option.is_correct)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(quiz)
    }

    pub async fn delete_quiz(&self, quiz_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Quiz not found".to_string()));
        }
        Ok(())
    }

    pub async fn create_question(
        &self,
        quiz_id: Uuid,
        payload: CreateQuestionPayload,
    ) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (quiz_id, text) VALUES ($1, $2) RETURNING *",
        )
        .bind(quiz_id)
        .bind(payload.text)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn update_question(
        &self,
        question_id: Uuid,
        payload: UpdateQuestionPayload,
    ) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            "UPDATE questions SET text = $1 WHERE id = $2 RETURNING *",
        )
        .bind(payload.text)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn delete_question(&self, question_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        Ok(())
    }

    pub async fn create_option(
        &self,
        question_id: Uuid,
        payload: CreateOptionPayload,
    ) -> Result<QuestionOption> {
        let option = sqlx::query_as::<_, QuestionOption>(
            "INSERT INTO options (question_id, text, is_correct) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(question_id)
        .bind(payload.text)
        .bind(payload.is_correct)
        .fetch_one(&self.pool)
        .await?;
        Ok(option)
    }

    pub async fn update_option(
        &self,
        option_id: Uuid,
        payload: UpdateOptionPayload,
    ) -> Result<QuestionOption> {
        let option = sqlx::query_as::<_, QuestionOption>(
            "UPDATE options SET text = $1, is_correct = $2 WHERE id = $3 RETURNING *",
        )
        .bind(payload.text)
        .bind(payload.is_correct)
        .bind(option_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(option)
    }

    pub async fn delete_option(&self, option_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM options WHERE id = $1")
            .bind(option_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Option not found".to_string()));
        }
        Ok(())
    }

    /// Rewrites the correctness flags for a question: every option is reset,
    /// then the listed ones are marked correct, in a single transaction.
    pub async fn set_correct_options(
        &self,
        question_id: Uuid,
        payload: SetCorrectOptionsPayload,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE options SET is_correct = FALSE WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE options SET is_correct = TRUE WHERE question_id = $1 AND id = ANY($2)",
        )
        .bind(question_id)
        .bind(&payload.option_ids)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::BadRequest(
                "None of the given options belong to this question".to_string(),
            ));
        }

        tx.commit().await?;
        Ok(())
    }
}
