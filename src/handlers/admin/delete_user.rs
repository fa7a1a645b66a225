use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{field_error, parse_id, AppState, Page};
use crate::sirius::{AuthUser, ClientError, Context, DeleteUser, FetchUser, ValidationErrors};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct DeleteUserVars {
    #[serde(flatten)]
    pub page: Page,
    pub user: AuthUser,
    pub success: bool,
    pub errors: Option<ValidationErrors>,
}

/// GET /delete-user/:id
pub async fn delete_user_get<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: FetchUser + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let user = state.client.user(&ctx, id).await?;

    let vars = DeleteUserVars {
        page: state.page(&uri, &ctx),
        user,
        success: false,
        errors: None,
    };

    state.render(templates::DELETE_USER, &vars)
}

/// POST /delete-user/:id
pub async fn delete_user_post<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchUser + DeleteUser + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let ctx = ctx.with_form_token(&form);

    let user = state.client.user(&ctx, id).await?;

    let mut vars = DeleteUserVars {
        page: state.page(&uri, &ctx),
        user,
        success: false,
        errors: None,
    };

    match state.client.delete_user(&ctx, id).await {
        Ok(()) => {
            vars.success = true;
            state.render(templates::DELETE_USER, &vars)
        }
        Err(ClientError::Validation(validation)) => {
            vars.errors = Some(validation.errors);
            state.render_status(StatusCode::BAD_REQUEST, templates::DELETE_USER, &vars)
        }
        Err(ClientError::Message(message)) => {
            vars.errors = Some(field_error("_", message));
            state.render_status(StatusCode::BAD_REQUEST, templates::DELETE_USER, &vars)
        }
        Err(err) => Err(err.into()),
    }
}
