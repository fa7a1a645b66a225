use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::handlers::{account, admin, AppState};
use crate::middleware::{require_roles, translate_errors, ErrorPages, RoleGuard, SYSTEM_ADMIN};
use crate::sirius::Platform;
use crate::templates::Template;

/// Build the application router over `client`, mounted under the
/// configured prefix.
pub fn app<C: Platform>(client: Arc<C>, templates: Arc<dyn Template>, config: &AppConfig) -> Router {
    let state = AppState::new(
        Arc::clone(&client),
        Arc::clone(&templates),
        config.sirius.public_url.clone(),
        config.server.prefix.clone(),
    );
    let pages = ErrorPages::new(
        templates,
        config.sirius.public_url.clone(),
        config.server.prefix.clone(),
    );
    let guard = RoleGuard::new(client, SYSTEM_ADMIN);

    let routes = Router::new()
        .merge(account_routes::<C>())
        .merge(admin_routes::<C>().route_layer(from_fn_with_state(guard, require_roles::<C>)))
        .fallback(not_found);

    let routes = if config.server.prefix.is_empty() {
        routes
    } else {
        // nest() serves `{prefix}` but not `{prefix}/`
        let prefix = &config.server.prefix;
        Router::new()
            .route(&format!("{prefix}/"), get(root))
            .nest(prefix, routes)
            .fallback(not_found)
    };

    routes
        .with_state(state)
        .layer(from_fn_with_state(pages, translate_errors))
        .layer(TraceLayer::new_for_http())
}

fn account_routes<C: Platform>() -> Router<AppState<C>> {
    Router::new()
        .route("/", get(root))
        .route("/health-check", get(health))
        .route("/my-details", get(account::my_details::<C>))
        .route(
            "/my-details/edit",
            get(account::edit_my_details_get::<C>).post(account::edit_my_details_post::<C>),
        )
        .route(
            "/change-password",
            get(account::change_password_get::<C>).post(account::change_password_post::<C>),
        )
}

fn admin_routes<C: Platform>() -> Router<AppState<C>> {
    Router::new()
        // Users
        .route("/users", get(admin::list_users::<C>))
        .route(
            "/add-user",
            get(admin::add_user_get::<C>).post(admin::add_user_post::<C>),
        )
        .route(
            "/edit-user/:id",
            get(admin::edit_user_get::<C>).post(admin::edit_user_post::<C>),
        )
        .route(
            "/delete-user/:id",
            get(admin::delete_user_get::<C>).post(admin::delete_user_post::<C>),
        )
        .route(
            "/resend-confirmation",
            get(admin::resend_confirmation_get).post(admin::resend_confirmation_post::<C>),
        )
        // Teams
        .route("/teams", get(admin::list_teams::<C>))
        .route(
            "/teams/add",
            get(admin::add_team_get::<C>).post(admin::add_team_post::<C>),
        )
        .route("/teams/:id", get(admin::view_team::<C>))
        .route(
            "/teams/edit/:id",
            get(admin::edit_team_get::<C>).post(admin::edit_team_post::<C>),
        )
        .route(
            "/teams/add-member/:id",
            get(admin::add_member_get::<C>).post(admin::add_member_post::<C>),
        )
        .route("/teams/remove-member/:id", post(admin::remove_member::<C>))
}

async fn root() -> AppError {
    AppError::redirect("/my-details")
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}

async fn not_found() -> AppError {
    AppError::not_found()
}
