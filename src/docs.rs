use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{dto as auth_dto, extractors::SESSION_COOKIE, handlers as auth_handlers},
    categories::{dto as category_dto, handlers as category_handlers, repo_types as category_types},
    error::ErrorBody,
    links::{dto as link_dto, handlers as link_handlers, repo_types as link_types},
    state::AppState,
};

pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Linkshelf API", description = "Bookmarks filed into categories by a language model."),
    paths(
        crate::app::health,
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::get_me,
        category_handlers::list_categories,
        category_handlers::create_category,
        category_handlers::update_category,
        category_handlers::delete_category,
        link_handlers::list_links,
        link_handlers::latest_links,
        link_handlers::create_link,
        link_handlers::update_link,
        link_handlers::delete_link,
    ),
    components(schemas(
        ErrorBody,
        auth_dto::RegisterRequest,
        auth_dto::LoginRequest,
        auth_dto::RegisteredUser,
        auth_dto::RegisterResponse,
        auth_dto::PublicUser,
        auth_dto::LoginResponse,
        auth_dto::MessageResponse,
        category_dto::CategoryRequest,
        category_dto::CategoryListResponse,
        category_dto::CategoryItemResponse,
        category_types::Category,
        category_types::CategorySummary,
        link_dto::CreateLinkRequest,
        link_dto::UpdateLinkRequest,
        link_dto::LinkListResponse,
        link_dto::SingleLinkResponse,
        link_types::Link,
        link_types::LinkItem,
    )),
    modifiers(&SessionCookie),
    tags(
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "categories"),
        (name = "links"),
    )
)]
pub struct ApiDoc;

/// Registers the `session` cookie as the API key scheme referenced by the paths.
struct SessionCookie;

impl Modify for SessionCookie {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

/// Swagger UI at `/docs`, backed by the generated document.
pub fn router() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/docs").url(OPENAPI_JSON, ApiDoc::openapi()))
}
