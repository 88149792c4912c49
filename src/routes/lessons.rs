use crate::{error::Result, utils::jwt::Claims, AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

pub async fn get_lesson(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state
        .lesson_service
        .get_detail(lesson_id, claims.user_id()?)
        .await?;
    Ok(Json(detail))
}

#[axum::debug_handler]
pub async fn complete_lesson(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let progress = state
        .progress_service
        .mark_lesson_completed(claims.user_id()?, lesson_id)
        .await?;
    Ok(Json(progress))
}
