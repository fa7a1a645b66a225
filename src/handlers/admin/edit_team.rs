use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::admin::add_team::chosen_team_type;
use crate::handlers::{parse_id, AppState, Page};
use crate::sirius::{
    CheckPermission, ClientError, Context, EditTeam, FetchTeam, FetchTeamTypes, Team, TeamType,
    ValidationErrors,
};
use crate::templates;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTeamVars {
    #[serde(flatten)]
    pub page: Page,
    pub team: Team,
    pub team_type_options: Vec<TeamType>,
    pub can_edit_team_type: bool,
    pub success: bool,
    pub errors: Option<ValidationErrors>,
}

/// Apply the submitted fields to `team`. The team type only changes when
/// the caller may edit it.
fn apply_form(team: &mut Team, form: &FormData, can_edit_team_type: bool, types: &[TeamType]) {
    team.display_name = form.value("name").to_string();
    team.phone_number = form.value("phone").to_string();
    team.email = form.value("email").to_string();

    if can_edit_team_type {
        team.set_team_type(&chosen_team_type(form), types);
    }
}

struct Loaded {
    team: Team,
    types: Vec<TeamType>,
    can_edit_team_type: bool,
}

async fn load<C>(client: &C, ctx: &Context, id: i64) -> Result<Loaded, AppError>
where
    C: FetchTeam + FetchTeamTypes + CheckPermission + Send + Sync,
{
    let can_edit_team_type = client.has_permission(ctx, "team", "post").await?;
    let team = client.team(ctx, id).await?;
    let types = client.team_types(ctx).await?;

    Ok(Loaded {
        team,
        types,
        can_edit_team_type,
    })
}

/// GET /teams/edit/:id
pub async fn edit_team_get<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: FetchTeam + FetchTeamTypes + CheckPermission + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let loaded = load(state.client.as_ref(), &ctx, id).await?;

    let vars = EditTeamVars {
        page: state.page(&uri, &ctx),
        team: loaded.team,
        team_type_options: loaded.types,
        can_edit_team_type: loaded.can_edit_team_type,
        success: false,
        errors: None,
    };

    state.render(templates::EDIT_TEAM, &vars)
}

/// POST /teams/edit/:id
pub async fn edit_team_post<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchTeam + FetchTeamTypes + CheckPermission + EditTeam + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let ctx = ctx.with_form_token(&form);
    let loaded = load(state.client.as_ref(), &ctx, id).await?;

    let mut team = loaded.team;
    apply_form(&mut team, &form, loaded.can_edit_team_type, &loaded.types);

    let mut vars = EditTeamVars {
        page: state.page(&uri, &ctx),
        team,
        team_type_options: loaded.types,
        can_edit_team_type: loaded.can_edit_team_type,
        success: false,
        errors: None,
    };

    match state.client.edit_team(&ctx, &vars.team).await {
        Ok(()) => {
            vars.success = true;
            state.render(templates::EDIT_TEAM, &vars)
        }
        Err(ClientError::Validation(validation)) => {
            vars.errors = Some(validation.errors);
            state.render_status(StatusCode::BAD_REQUEST, templates::EDIT_TEAM, &vars)
        }
        Err(err) => Err(err.into()),
    }
}
