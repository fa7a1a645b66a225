use axum::{extract::State, http::StatusCode, http::Uri, response::Response};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{AppState, Page};
use crate::sirius::{ClientError, Context, EditMyDetails, FetchMyDetails, ValidationErrors};
use crate::templates;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMyDetailsVars {
    #[serde(flatten)]
    pub page: Page,
    pub phone_number: String,
    pub errors: Option<ValidationErrors>,
}

/// GET /my-details/edit
pub async fn edit_my_details_get<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: FetchMyDetails + Send + Sync + 'static,
{
    let details = state.client.my_details(&ctx).await?;

    let vars = EditMyDetailsVars {
        page: state.page(&uri, &ctx),
        phone_number: details.phone_number,
        errors: None,
    };

    state.render(templates::EDIT_MY_DETAILS, &vars)
}

/// POST /my-details/edit
pub async fn edit_my_details_post<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchMyDetails + EditMyDetails + Send + Sync + 'static,
{
    let ctx = ctx.with_form_token(&form);
    let phone_number = form.value("phonenumber");

    let details = state.client.my_details(&ctx).await?;

    match state
        .client
        .edit_my_details(&ctx, details.id, phone_number)
        .await
    {
        Ok(()) => Err(AppError::redirect("/my-details")),
        Err(ClientError::Validation(validation)) => {
            let vars = EditMyDetailsVars {
                page: state.page(&uri, &ctx),
                phone_number: phone_number.to_string(),
                errors: Some(validation.errors),
            };

            state.render_status(StatusCode::BAD_REQUEST, templates::EDIT_MY_DETAILS, &vars)
        }
        Err(err) => Err(err.into()),
    }
}
