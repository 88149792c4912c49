use crate::{
    dto::{
        admin_dto::{ListUsersQuery, UpdateRolePayload},
        course_dto::{CreateCoursePayload, PageQuery, UpdateCoursePayload},
        lesson_dto::{CreateLessonPayload, ReorderLessonsPayload, UpdateLessonPayload},
        quiz_dto::{
            CreateOptionPayload, CreateQuestionPayload, SaveQuizPayload, SetCorrectOptionsPayload,
            UpdateOptionPayload, UpdateQuestionPayload,
        },
    },
    error::Result,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

// ---- Courses ----

pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let result = state
        .course_service
        .list_courses(page, limit, query.search)
        .await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn create_course(
    State(state): State<AppState>,
    Json(payload): Json<CreateCoursePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let course = state.course_service.create_course(payload).await?;

    tracing::info!(course_id = %course.id, "Course created");

    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (course, lessons) = state.course_service.get_course_with_lessons(course_id).await?;
    Ok(Json(json!({ "course": course, "lessons": lessons })))
}

#[axum::debug_handler]
pub async fn update_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<UpdateCoursePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let course = state.course_service.update_course(course_id, payload).await?;
    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.course_service.delete_course(course_id).await?;

    tracing::info!(course_id = %course_id, "Course deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---- Lessons ----

#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateLessonPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let lesson = state.lesson_service.create_lesson(course_id, payload).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[axum::debug_handler]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<UpdateLessonPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let lesson = state.lesson_service.update_lesson(lesson_id, payload).await?;
    Ok(Json(lesson))
}

pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.lesson_service.delete_lesson(lesson_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn reorder_lessons(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<ReorderLessonsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state.lesson_service.reorder(course_id, payload).await?;
    Ok(Json(json!({ "status": "success" })))
}

// ---- Quizzes ----

/// Replaces the whole quiz for a lesson. Existing questions and options are
/// dropped and recreated from the payload; past results stay untouched.
#[axum::debug_handler]
pub async fn save_quiz(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<SaveQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.save_quiz(lesson_id, payload).await?;

    tracing::info!(lesson_id = %lesson_id, quiz_id = %quiz.id, "Quiz saved");

    Ok(Json(quiz))
}

pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_quiz(quiz_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.quiz_service.create_question(quiz_id, payload).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state
        .quiz_service
        .update_question(question_id, payload)
        .await?;
    Ok(Json(question))
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_question(question_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn create_option(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<CreateOptionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let option = state.quiz_service.create_option(question_id, payload).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

#[axum::debug_handler]
pub async fn update_option(
    State(state): State<AppState>,
    Path(option_id): Path<Uuid>,
    Json(payload): Json<UpdateOptionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let option = state.quiz_service.update_option(option_id, payload).await?;
    Ok(Json(option))
}

pub async fn delete_option(
    State(state): State<AppState>,
    Path(option_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_option(option_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn set_correct_options(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<SetCorrectOptionsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .quiz_service
        .set_correct_options(question_id, payload)
        .await?;
    Ok(Json(json!({ "status": "success" })))
}

// ---- Results ----

pub async fn quiz_results(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let result = state.result_service.list_by_quiz(quiz_id, page, limit).await?;
    Ok(Json(result))
}

pub async fn delete_result(
    State(state): State<AppState>,
    Path(result_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.result_service.delete_result(result_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drops one user's quiz results across a course so its quizzes can be
/// retaken. Lesson completion records stay in place.
pub async fn reset_user_course(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    state.user_service.get_user(user_id).await?;
    state.course_service.get_course(course_id).await?;

    let deleted = state
        .result_service
        .reset_for_course(user_id, course_id)
        .await?;

    tracing::info!(
        user_id = %user_id,
        course_id = %course_id,
        deleted_results = deleted,
        "User course progress reset"
    );

    Ok(Json(json!({ "status": "success", "deleted_results": deleted })))
}

// ---- Users ----

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let result = state
        .user_service
        .list_users(page, limit, query.search, query.role)
        .await?;
    Ok(Json(result))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_summary(user_id).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.update_role(user_id, &payload.role).await?;

    tracing::info!(user_id = %user_id, role = %payload.role, "User role changed");

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.user_service.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Reporting ----

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let metrics = state.dashboard_service.admin_metrics().await?;
    Ok(Json(metrics))
}

pub async fn course_analytics(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let analytics = state.dashboard_service.course_analytics(course_id).await?;
    Ok(Json(analytics))
}
