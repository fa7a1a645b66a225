use axum::{extract::State, http::Uri, response::Response};
use serde::Serialize;

use crate::error::AppError;
use crate::handlers::{AppState, Page};
use crate::sirius::{CheckPermission, Context, FetchMyDetails};
use crate::templates;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyDetailsVars {
    #[serde(flatten)]
    pub page: Page,
    pub id: i64,
    pub firstname: String,
    pub surname: String,
    pub email: String,
    pub phone_number: String,
    pub organisation: String,
    pub roles: Vec<String>,
    pub teams: Vec<String>,
    pub can_edit_phone_number: bool,
}

/// GET /my-details
pub async fn my_details<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: FetchMyDetails + CheckPermission + Send + Sync + 'static,
{
    let details = state.client.my_details(&ctx).await?;
    let can_edit_phone_number = state.client.has_permission(&ctx, "user", "patch").await?;

    let (organisation, roles) = details.organisation_and_roles();

    let vars = MyDetailsVars {
        page: state.page(&uri, &ctx),
        id: details.id,
        firstname: details.firstname,
        surname: details.surname,
        email: details.email,
        phone_number: details.phone_number,
        organisation,
        roles,
        teams: details.teams.into_iter().map(|t| t.display_name).collect(),
        can_edit_phone_number,
    };

    state.render(templates::MY_DETAILS, &vars)
}
