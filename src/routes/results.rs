use crate::{
    dto::course_dto::PageQuery,
    error::{Error, Result},
    models::user::Role,
    utils::jwt::Claims,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

pub async fn my_results(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let result = state
        .result_service
        .list_by_user(claims.user_id()?, page, limit)
        .await?;
    Ok(Json(result))
}

/// A single result with its per-question answers. Employees can only read
/// their own history; admins can read anyone's.
pub async fn get_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.result_service.get_result(result_id).await?;

    let is_admin = claims
        .role
        .as_deref()
        .and_then(|r| r.parse::<Role>().ok())
        == Some(Role::Admin);
    if !is_admin && detail.result.user_id != claims.user_id()? {
        return Err(Error::NotFound("Resource not found".to_string()));
    }

    Ok(Json(detail))
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let dashboard = state
        .dashboard_service
        .user_dashboard(claims.user_id()?)
        .await?;
    Ok(Json(dashboard))
}
