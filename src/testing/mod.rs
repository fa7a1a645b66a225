//! Test doubles for the platform client and page renderer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::handlers::AppState;
use crate::sirius::{
    AddTeam, AddUser, AuthUser, ChangePassword, CheckPermission, ClientError, Context,
    DeleteUser, EditMyDetails, EditTeam, EditUser, FetchMyDetails, FetchTeam, FetchTeamTypes,
    FetchTeams, FetchUser, MyDetails, NewTeam, NewUser, ResendConfirmation, SearchUsers, Team,
    TeamMember, TeamType, User,
};
use crate::templates::{RenderError, Template};

/// A platform call and its arguments, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    MyDetails,
    EditMyDetails { id: i64, phone_number: String },
    HasPermission { group: String, method: String },
    ChangePassword { existing: String, password: String, confirm: String },
    ResendConfirmation { email: String },
    SearchUsers { term: String },
    User { id: i64 },
    AddUser(NewUser),
    EditUser(AuthUser),
    DeleteUser { id: i64 },
    Teams,
    Team { id: i64 },
    EditTeam(Team),
    AddTeam(NewTeam),
    TeamTypes,
}

/// Returns canned data and records every call. An error registered with
/// [`MockPlatform::failing`] is returned once by the named operation.
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub my_details: MyDetails,
    pub users: Vec<User>,
    pub user: AuthUser,
    pub teams: Vec<Team>,
    pub team: Team,
    pub team_types: Vec<TeamType>,
    pub permitted: bool,
    pub new_team_id: i64,
    pub(crate) failures: Mutex<HashMap<&'static str, ClientError>>,
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) contexts: Mutex<Vec<Context>>,
}

impl MockPlatform {
    pub fn failing(self, operation: &'static str, err: ClientError) -> Self {
        self.failures.lock().unwrap().insert(operation, err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn contexts(&self) -> Vec<Context> {
        self.contexts.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, ctx: &Context, call: Call) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        self.contexts.lock().unwrap().push(ctx.clone());

        match self.failures.lock().unwrap().remove(operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FetchMyDetails for MockPlatform {
    async fn my_details(&self, ctx: &Context) -> Result<MyDetails, ClientError> {
        self.record("my_details", ctx, Call::MyDetails)?;
        Ok(self.my_details.clone())
    }
}

#[async_trait]
impl EditMyDetails for MockPlatform {
    async fn edit_my_details(
        &self,
        ctx: &Context,
        id: i64,
        phone_number: &str,
    ) -> Result<(), ClientError> {
        self.record(
            "edit_my_details",
            ctx,
            Call::EditMyDetails {
                id,
                phone_number: phone_number.to_string(),
            },
        )
    }
}

#[async_trait]
impl CheckPermission for MockPlatform {
    async fn has_permission(
        &self,
        ctx: &Context,
        group: &str,
        method: &str,
    ) -> Result<bool, ClientError> {
        self.record(
            "has_permission",
            ctx,
            Call::HasPermission {
                group: group.to_string(),
                method: method.to_string(),
            },
        )?;
        Ok(self.permitted)
    }
}

#[async_trait]
impl ChangePassword for MockPlatform {
    async fn change_password(
        &self,
        ctx: &Context,
        existing_password: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), ClientError> {
        self.record(
            "change_password",
            ctx,
            Call::ChangePassword {
                existing: existing_password.to_string(),
                password: password.to_string(),
                confirm: confirm_password.to_string(),
            },
        )
    }
}

#[async_trait]
impl ResendConfirmation for MockPlatform {
    async fn resend_confirmation(&self, ctx: &Context, email: &str) -> Result<(), ClientError> {
        self.record(
            "resend_confirmation",
            ctx,
            Call::ResendConfirmation {
                email: email.to_string(),
            },
        )
    }
}

#[async_trait]
impl SearchUsers for MockPlatform {
    async fn search_users(&self, ctx: &Context, term: &str) -> Result<Vec<User>, ClientError> {
        self.record(
            "search_users",
            ctx,
            Call::SearchUsers {
                term: term.to_string(),
            },
        )?;
        Ok(self.users.clone())
    }
}

#[async_trait]
impl FetchUser for MockPlatform {
    async fn user(&self, ctx: &Context, id: i64) -> Result<AuthUser, ClientError> {
        self.record("user", ctx, Call::User { id })?;
        Ok(self.user.clone())
    }
}

#[async_trait]
impl AddUser for MockPlatform {
    async fn add_user(&self, ctx: &Context, user: &NewUser) -> Result<(), ClientError> {
        self.record("add_user", ctx, Call::AddUser(user.clone()))
    }
}

#[async_trait]
impl EditUser for MockPlatform {
    async fn edit_user(&self, ctx: &Context, user: &AuthUser) -> Result<(), ClientError> {
        self.record("edit_user", ctx, Call::EditUser(user.clone()))
    }
}

#[async_trait]
impl DeleteUser for MockPlatform {
    async fn delete_user(&self, ctx: &Context, id: i64) -> Result<(), ClientError> {
        self.record("delete_user", ctx, Call::DeleteUser { id })
    }
}

#[async_trait]
impl FetchTeams for MockPlatform {
    async fn teams(&self, ctx: &Context) -> Result<Vec<Team>, ClientError> {
        self.record("teams", ctx, Call::Teams)?;
        Ok(self.teams.clone())
    }
}

#[async_trait]
impl FetchTeam for MockPlatform {
    async fn team(&self, ctx: &Context, id: i64) -> Result<Team, ClientError> {
        self.record("team", ctx, Call::Team { id })?;
        Ok(self.team.clone())
    }
}

#[async_trait]
impl EditTeam for MockPlatform {
    async fn edit_team(&self, ctx: &Context, team: &Team) -> Result<(), ClientError> {
        self.record("edit_team", ctx, Call::EditTeam(team.clone()))
    }
}

#[async_trait]
impl AddTeam for MockPlatform {
    async fn add_team(&self, ctx: &Context, team: &NewTeam) -> Result<i64, ClientError> {
        self.record("add_team", ctx, Call::AddTeam(team.clone()))?;
        Ok(self.new_team_id)
    }
}

#[async_trait]
impl FetchTeamTypes for MockPlatform {
    async fn team_types(&self, ctx: &Context) -> Result<Vec<TeamType>, ClientError> {
        self.record("team_types", ctx, Call::TeamTypes)?;
        Ok(self.team_types.clone())
    }
}

type FailWith = fn() -> RenderError;

/// Records every render as `(page, vars)`.
#[derive(Debug, Default)]
pub struct RecordingTemplate {
    renders: Mutex<Vec<(String, Value)>>,
    fail_with: Option<FailWith>,
}

impl RecordingTemplate {
    pub fn failing_with(fail_with: FailWith) -> Self {
        Self {
            renders: Mutex::default(),
            fail_with: Some(fail_with),
        }
    }

    pub fn renders(&self) -> Vec<(String, Value)> {
        self.renders.lock().unwrap().clone()
    }

    pub fn last_render(&self) -> (String, Value) {
        self.renders()
            .pop()
            .expect("template was never rendered")
    }
}

impl Template for RecordingTemplate {
    fn render(&self, page: &str, vars: &Value) -> Result<String, RenderError> {
        self.renders
            .lock()
            .unwrap()
            .push((page.to_string(), vars.clone()));

        match self.fail_with {
            Some(fail_with) => Err(fail_with()),
            None => Ok(page.to_string()),
        }
    }
}

/// Handler state over a mock, plus handles for inspecting it afterwards.
pub fn state(
    platform: MockPlatform,
) -> (AppState<MockPlatform>, Arc<MockPlatform>, Arc<RecordingTemplate>) {
    let platform = Arc::new(platform);
    let template = Arc::new(RecordingTemplate::default());
    let state = AppState::new(
        Arc::clone(&platform),
        template.clone(),
        "http://sirius",
        "",
    );
    (state, platform, template)
}

/// A team whose members are `User <id>` for each id.
pub fn team_with_ids(id: i64, member_ids: &[i64]) -> Team {
    Team {
        id,
        display_name: "Test team".to_string(),
        members: member_ids
            .iter()
            .map(|&member| TeamMember {
                id: member,
                display_name: format!("User {member}"),
                email: format!("user{member}@opgtest.com"),
            })
            .collect(),
        ..Team::default()
    }
}

/// Session for a GET carrying `XSRF-TOKEN=abcde`.
pub fn context() -> Context {
    Context::new(
        vec![crate::sirius::Cookie::new("XSRF-TOKEN", "abcde")],
        "abcde",
    )
}
