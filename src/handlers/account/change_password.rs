use axum::{extract::State, http::StatusCode, http::Uri, response::Response};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{field_error, AppState, Page};
use crate::sirius::{ChangePassword, ClientError, Context, ValidationErrors};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct ChangePasswordVars {
    #[serde(flatten)]
    pub page: Page,
    pub success: bool,
    pub errors: Option<ValidationErrors>,
}

/// GET /change-password
pub async fn change_password_get<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: Send + Sync + 'static,
{
    let vars = ChangePasswordVars {
        page: state.page(&uri, &ctx),
        success: false,
        errors: None,
    };

    state.render(templates::CHANGE_PASSWORD, &vars)
}

/// POST /change-password
pub async fn change_password_post<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: ChangePassword + Send + Sync + 'static,
{
    let ctx = ctx.with_form_token(&form);

    let mut vars = ChangePasswordVars {
        page: state.page(&uri, &ctx),
        success: false,
        errors: None,
    };

    let result = state
        .client
        .change_password(
            &ctx,
            form.value("currentpassword"),
            form.value("password1"),
            form.value("password2"),
        )
        .await;

    match result {
        Ok(()) => {
            vars.success = true;
            state.render(templates::CHANGE_PASSWORD, &vars)
        }
        Err(ClientError::Message(message)) => {
            vars.errors = Some(field_error("currentpassword", message));
            state.render_status(StatusCode::BAD_REQUEST, templates::CHANGE_PASSWORD, &vars)
        }
        Err(err) => Err(err.into()),
    }
}
