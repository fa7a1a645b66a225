use axum::{extract::State, http::Uri, response::Response};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{AppState, Page};
use crate::sirius::{Context, ResendConfirmation};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct ResendConfirmationVars {
    #[serde(flatten)]
    pub page: Page,
    pub id: String,
    pub email: String,
}

/// GET /resend-confirmation has nothing to show.
pub async fn resend_confirmation_get() -> AppError {
    AppError::redirect("/users")
}

/// POST /resend-confirmation
pub async fn resend_confirmation_post<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: ResendConfirmation + Send + Sync + 'static,
{
    let ctx = ctx.with_form_token(&form);
    let email = form.value("email");

    state.client.resend_confirmation(&ctx, email).await?;

    let vars = ResendConfirmationVars {
        page: state.page(&uri, &ctx),
        id: form.value("id").to_string(),
        email: email.to_string(),
    };

    state.render(templates::RESEND_CONFIRMATION, &vars)
}
