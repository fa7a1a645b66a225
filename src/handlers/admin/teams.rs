use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{parse_id, AppState, Page};
use crate::sirius::{Context, FetchTeam, FetchTeams, Team};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct ListTeamsVars {
    #[serde(flatten)]
    pub page: Page,
    pub search: String,
    pub teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
pub struct ViewTeamVars {
    #[serde(flatten)]
    pub page: Page,
    pub team: Team,
}

/// Keep teams whose display name contains `search`, ignoring case.
pub fn filter_teams(teams: Vec<Team>, search: &str) -> Vec<Team> {
    if search.is_empty() {
        return teams;
    }

    let needle = search.to_lowercase();
    teams
        .into_iter()
        .filter(|team| team.display_name.to_lowercase().contains(&needle))
        .collect()
}

/// GET /teams
pub async fn list_teams<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchTeams + Send + Sync + 'static,
{
    let teams = state.client.teams(&ctx).await?;
    let search = form.value("search");

    let vars = ListTeamsVars {
        page: state.page(&uri, &ctx),
        search: search.to_string(),
        teams: filter_teams(teams, search),
    };

    state.render(templates::TEAMS, &vars)
}

/// GET /teams/:id
pub async fn view_team<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: FetchTeam + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let team = state.client.team(&ctx, id).await?;

    let vars = ViewTeamVars {
        page: state.page(&uri, &ctx),
        team,
    };

    state.render(templates::TEAM, &vars)
}
