use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CategoryItemResponse, CategoryListResponse, CategoryRequest, CategoryResponse},
    repo_types::{Category, CategorySummary},
};
use crate::{
    auth::extractors::SessionUser,
    error::{AppError, ErrorBody},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            patch(update_category).delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    security(("session" = [])),
    responses(
        (status = 200, body = CategoryListResponse),
        (status = 401, body = ErrorBody),
    )
)]
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_categories(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<CategoryResponse<Vec<CategorySummary>>>, AppError> {
    let data = state.categories.list(user.id).await?;
    Ok(Json(CategoryResponse {
        message: "Categories are sucessfully loaded",
        data,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    security(("session" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, body = CategoryItemResponse),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
    )
)]
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_category(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Json(mut body), _): WithRejection<Json<CategoryRequest>, AppError>,
) -> Result<(StatusCode, Json<CategoryResponse<Category>>), AppError> {
    body.validate()?;
    let data = state.categories.create(user.id, &body.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            message: "Category is created",
            data,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, body = CategoryItemResponse),
        (status = 403, description = "Owned by another user", body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_category(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(mut body), _): WithRejection<Json<CategoryRequest>, AppError>,
) -> Result<Json<CategoryResponse<Category>>, AppError> {
    body.validate()?;
    let data = state.categories.update(user.id, id, &body.name).await?;
    Ok(Json(CategoryResponse {
        message: "Update category success",
        data,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted along with its links", body = CategoryItemResponse),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_category(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<CategoryResponse<Category>>, AppError> {
    let data = state.categories.delete(user.id, id).await?;
    Ok(Json(CategoryResponse {
        message: "Delete category success",
        data,
    }))
}
