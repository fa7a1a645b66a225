use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::admin::users::{search, UserRow};
use crate::handlers::{field_error, parse_id, AppState, Page};
use crate::sirius::{
    ClientError, Context, EditTeam, FetchTeam, SearchUsers, Team, TeamMember, User,
    ValidationErrors,
};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct AddMemberVars {
    #[serde(flatten)]
    pub page: Page,
    pub team: Team,
    pub search: String,
    pub users: Vec<UserRow>,
    /// Whether each listed user already belongs to the team.
    pub members: BTreeMap<i64, bool>,
    /// Email of the user just added.
    pub success: String,
    pub errors: Option<ValidationErrors>,
}

/// Search results start out as non-members; current members are marked.
pub fn membership(users: &[User], team: &Team) -> BTreeMap<i64, bool> {
    let mut members: BTreeMap<i64, bool> = users.iter().map(|u| (u.id, false)).collect();
    for member in &team.members {
        members.insert(member.id, true);
    }
    members
}

/// GET /teams/add-member/:id
pub async fn add_member_get<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchTeam + SearchUsers + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let team = state.client.team(&ctx, id).await?;

    let term = form.value("search");
    let (users, errors) = search(state.client.as_ref(), &ctx, term).await?;

    let vars = AddMemberVars {
        page: state.page(&uri, &ctx),
        members: membership(&users, &team),
        team,
        search: term.to_string(),
        users: users.into_iter().map(UserRow::from).collect(),
        success: String::new(),
        errors,
    };

    state.render(templates::ADD_TEAM_MEMBER, &vars)
}

/// POST /teams/add-member/:id
pub async fn add_member_post<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchTeam + EditTeam + SearchUsers + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let ctx = ctx.with_form_token(&form);
    let user_id: i64 = form
        .value("id")
        .parse()
        .map_err(|_| AppError::bad_request())?;

    let team = state.client.team(&ctx, id).await?;

    let mut updated = team.clone();
    if !updated.has_member(user_id) {
        updated.members.push(TeamMember {
            id: user_id,
            email: form.value("email").to_string(),
            ..TeamMember::default()
        });
    }

    let (team, success, mut errors, status) = match state.client.edit_team(&ctx, &updated).await {
        Ok(()) => (updated, form.value("email").to_string(), None, StatusCode::OK),
        Err(ClientError::Validation(validation)) => {
            (team, String::new(), Some(validation.errors), StatusCode::BAD_REQUEST)
        }
        Err(ClientError::Message(message)) => (
            team,
            String::new(),
            Some(field_error("search", message)),
            StatusCode::BAD_REQUEST,
        ),
        Err(err) => return Err(err.into()),
    };

    let term = form.value("search");
    let (users, search_errors) = search(state.client.as_ref(), &ctx, term).await?;
    if errors.is_none() {
        errors = search_errors;
    }

    let vars = AddMemberVars {
        page: state.page(&uri, &ctx),
        members: membership(&users, &team),
        team,
        search: term.to_string(),
        users: users.into_iter().map(UserRow::from).collect(),
        success,
        errors,
    };

    state.render_status(status, templates::ADD_TEAM_MEMBER, &vars)
}
