use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        CreateLinkRequest, SingleLinkResponse, LinkListResponse, LinkQuery, LinkResponse,
        UpdateLinkRequest,
    },
    repo_types::{Link, LinkItem},
};
use crate::{
    auth::extractors::SessionUser,
    error::{AppError, ErrorBody},
    state::AppState,
};

pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links).post(create_link))
        .route("/latest-links", get(latest_links))
        .route("/links/:id", patch(update_link).delete(delete_link))
}

#[utoipa::path(
    get,
    path = "/api/v1/links",
    tag = "links",
    security(("session" = [])),
    params(LinkQuery),
    responses(
        (status = 200, description = "Newest first", body = LinkListResponse),
        (status = 401, body = ErrorBody),
    )
)]
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_links(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Query(query), _): WithRejection<Query<LinkQuery>, AppError>,
) -> Result<Json<LinkResponse<Vec<LinkItem>>>, AppError> {
    let data = state.links.list(user.id, query.into()).await?;
    Ok(Json(LinkResponse::ok(data)))
}

#[utoipa::path(
    get,
    path = "/api/v1/latest-links",
    tag = "links",
    security(("session" = [])),
    responses(
        (status = 200, description = "The five newest links", body = LinkListResponse),
        (status = 401, body = ErrorBody),
    )
)]
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn latest_links(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
) -> Result<Json<LinkResponse<Vec<LinkItem>>>, AppError> {
    let data = state.links.latest(user.id).await?;
    Ok(Json(LinkResponse::ok(data)))
}

/// POST /links { link } -- title, summary and category are generated.
#[utoipa::path(
    post,
    path = "/api/v1/links",
    tag = "links",
    security(("session" = [])),
    request_body = CreateLinkRequest,
    responses(
        (status = 201, body = SingleLinkResponse),
        (status = 400, description = "URL format is not valid", body = ErrorBody),
        (status = 404, description = "No category to file the link under", body = ErrorBody),
        (status = 500, description = "Categorization failed", body = ErrorBody),
    )
)]
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_link(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Json(body), _): WithRejection<Json<CreateLinkRequest>, AppError>,
) -> Result<(StatusCode, Json<LinkResponse<Link>>), AppError> {
    let data = state.links.create(user.id, body.link.trim()).await?;
    Ok((StatusCode::CREATED, Json(LinkResponse::ok(data))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/links/{id}",
    tag = "links",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Link id")),
    request_body = UpdateLinkRequest,
    responses(
        (status = 200, body = SingleLinkResponse),
        (status = 400, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_link(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateLinkRequest>, AppError>,
) -> Result<Json<LinkResponse<Link>>, AppError> {
    let changes = body.into_changes()?;
    let data = state.links.update(user.id, id, changes).await?;
    Ok(Json(LinkResponse::ok(data)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/links/{id}",
    tag = "links",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Link id")),
    responses(
        (status = 200, body = SingleLinkResponse),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody),
    )
)]
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_link(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<LinkResponse<Link>>, AppError> {
    let data = state.links.delete(user.id, id).await?;
    Ok(Json(LinkResponse::ok(data)))
}
