use crate::{
    dto::course_dto::PageQuery, error::Result, utils::jwt::Claims, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

/// Course catalog with the caller's own completion percentage per course.
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let result = state
        .course_service
        .list_courses_with_progress(claims.user_id()?, page, limit, query.search)
        .await?;
    Ok(Json(result))
}

pub async fn get_course(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state
        .dashboard_service
        .user_course_detail(claims.user_id()?, course_id)
        .await?;
    Ok(Json(detail))
}
