use crate::{
    dto::quiz_dto::SubmitQuizRequest, error::Result, utils::jwt::Claims, AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

/// Quiz for a lesson, with correct-answer flags stripped from the options.
pub async fn get_lesson_quiz(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let view = state.quiz_service.taker_view(lesson_id).await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let response = state
        .result_service
        .submit_quiz(user_id, quiz_id, payload.answers)
        .await?;

    tracing::info!(
        user_id = %user_id,
        quiz_id = %quiz_id,
        score = response.score,
        "Quiz submitted"
    );

    Ok(Json(response))
}

pub async fn latest_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .result_service
        .latest_result(claims.user_id()?, quiz_id)
        .await?;
    Ok(Json(result))
}
