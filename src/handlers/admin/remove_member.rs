use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{field_error, parse_id, AppState, Page};
use crate::sirius::{ClientError, Context, EditTeam, FetchTeam, Team, ValidationErrors};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct RemoveMemberVars {
    #[serde(flatten)]
    pub page: Page,
    pub team: Team,
    /// Member id to display name, for the members being removed.
    pub selected: BTreeMap<i64, String>,
    pub errors: Option<ValidationErrors>,
}

fn selected_ids(form: &FormData) -> Result<Vec<i64>, AppError> {
    form.values("selected[]")
        .iter()
        .map(|raw| raw.parse().map_err(|_| AppError::bad_request()))
        .collect()
}

/// POST /teams/remove-member/:id
///
/// Without `confirm` this only shows who would be removed.
pub async fn remove_member<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchTeam + EditTeam + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let ctx = ctx.with_form_token(&form);
    let ids = selected_ids(&form)?;

    let team = state.client.team(&ctx, id).await?;

    let selected: BTreeMap<i64, String> = team
        .members
        .iter()
        .filter(|member| ids.contains(&member.id))
        .map(|member| (member.id, member.display_name.clone()))
        .collect();

    let mut vars = RemoveMemberVars {
        page: state.page(&uri, &ctx),
        team,
        selected,
        errors: None,
    };

    if !form.has("confirm") {
        return state.render(templates::REMOVE_TEAM_MEMBER, &vars);
    }

    let mut updated = vars.team.clone();
    updated.members.retain(|member| !ids.contains(&member.id));

    match state.client.edit_team(&ctx, &updated).await {
        Ok(()) => Err(AppError::redirect(format!("/teams/{id}"))),
        Err(ClientError::Validation(validation)) => {
            vars.errors = Some(validation.errors);
            state.render_status(StatusCode::BAD_REQUEST, templates::REMOVE_TEAM_MEMBER, &vars)
        }
        Err(ClientError::Message(message)) => {
            vars.errors = Some(field_error("_", message));
            state.render_status(StatusCode::BAD_REQUEST, templates::REMOVE_TEAM_MEMBER, &vars)
        }
        Err(err) => Err(err.into()),
    }
}
