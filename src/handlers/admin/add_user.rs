use axum::{extract::State, http::StatusCode, http::Uri, response::Response};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{AppState, Page};
use crate::sirius::{AddUser, ClientError, Context, NewUser, ValidationErrors};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct AddUserVars {
    #[serde(flatten)]
    pub page: Page,
    pub errors: Option<ValidationErrors>,
}

/// GET /add-user
pub async fn add_user_get<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: Send + Sync + 'static,
{
    let vars = AddUserVars {
        page: state.page(&uri, &ctx),
        errors: None,
    };

    state.render(templates::ADD_USER, &vars)
}

/// POST /add-user
pub async fn add_user_post<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: AddUser + Send + Sync + 'static,
{
    let ctx = ctx.with_form_token(&form);

    let user = NewUser {
        email: form.value("email").to_string(),
        firstname: form.value("firstname").to_string(),
        surname: form.value("surname").to_string(),
        organisation: form.value("organisation").to_string(),
        roles: form.values("roles"),
    };

    match state.client.add_user(&ctx, &user).await {
        Ok(()) => Err(AppError::redirect("/users")),
        Err(ClientError::Validation(validation)) => {
            let vars = AddUserVars {
                page: state.page(&uri, &ctx),
                errors: Some(validation.errors),
            };
            state.render_status(StatusCode::BAD_REQUEST, templates::ADD_USER, &vars)
        }
        Err(err) => Err(err.into()),
    }
}
