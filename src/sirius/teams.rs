use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Client, ClientError, Context};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub display_name: String,
    pub phone_number: String,
    pub email: String,
    pub members: Vec<TeamMember>,
    /// Team type handle; empty for LPA teams.
    pub team_type: String,
    pub type_label: String,
}

impl Team {
    pub fn has_member(&self, id: i64) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn member_ids(&self) -> Vec<i64> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Set the team type, recomputing the display label from reference data.
    pub fn set_team_type(&mut self, handle: &str, types: &[TeamType]) {
        let label = types
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.label.as_str())
            .unwrap_or(handle);

        self.team_type = handle.to_string();
        self.type_label = type_label(handle, label);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamType {
    pub handle: String,
    #[serde(default)]
    pub label: String,
}

/// A team to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    /// Empty for an LPA team.
    pub team_type: String,
    pub phone: String,
    pub email: String,
}

fn type_label(handle: &str, label: &str) -> String {
    if handle.is_empty() {
        "LPA".to_string()
    } else {
        format!("Supervision — {label}")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTeam {
    id: i64,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    members: Vec<TeamMember>,
    #[serde(default)]
    team_type: Option<TeamType>,
}

impl From<ApiTeam> for Team {
    fn from(team: ApiTeam) -> Self {
        let (team_type, type_label) = match team.team_type {
            Some(t) => {
                let label = type_label(&t.handle, &t.label);
                (t.handle, label)
            }
            None => (String::new(), type_label("", "")),
        };

        Team {
            id: team.id,
            display_name: team.display_name,
            phone_number: team.phone_number,
            email: team.email,
            members: team.members,
            team_type,
            type_label,
        }
    }
}

#[derive(Deserialize)]
struct CreatedTeam {
    data: CreatedTeamData,
}

#[derive(Deserialize)]
struct CreatedTeamData {
    id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamTypeReference {
    #[serde(default)]
    team_type: Vec<TeamType>,
}

#[async_trait]
pub trait FetchTeams {
    async fn teams(&self, ctx: &Context) -> Result<Vec<Team>, ClientError>;
}

#[async_trait]
pub trait FetchTeam {
    async fn team(&self, ctx: &Context, id: i64) -> Result<Team, ClientError>;
}

/// Replace a team wholesale, including its full member list.
#[async_trait]
pub trait EditTeam {
    async fn edit_team(&self, ctx: &Context, team: &Team) -> Result<(), ClientError>;
}

/// Create a team, returning the new team's id.
#[async_trait]
pub trait AddTeam {
    async fn add_team(&self, ctx: &Context, team: &NewTeam) -> Result<i64, ClientError>;
}

#[async_trait]
pub trait FetchTeamTypes {
    async fn team_types(&self, ctx: &Context) -> Result<Vec<TeamType>, ClientError>;
}

#[async_trait]
impl FetchTeams for Client {
    async fn teams(&self, ctx: &Context) -> Result<Vec<Team>, ClientError> {
        let reply = self
            .execute(self.request(ctx, Method::GET, "/api/v1/teams"))
            .await?;

        if !reply.is_success() {
            return Err(reply.status_error());
        }

        let teams: Vec<ApiTeam> = reply.json()?;
        Ok(teams.into_iter().map(Team::from).collect())
    }
}

#[async_trait]
impl FetchTeam for Client {
    async fn team(&self, ctx: &Context, id: i64) -> Result<Team, ClientError> {
        let reply = self
            .execute(self.request(ctx, Method::GET, &format!("/api/v1/teams/{id}")))
            .await?;

        if !reply.is_success() {
            return Err(reply.status_error());
        }

        let team: ApiTeam = reply.json()?;
        Ok(team.into())
    }
}

#[async_trait]
impl EditTeam for Client {
    async fn edit_team(&self, ctx: &Context, team: &Team) -> Result<(), ClientError> {
        let members: Vec<_> = team.members.iter().map(|m| json!({ "id": m.id })).collect();

        let mut body = json!({
            "name": team.display_name,
            "phoneNumber": team.phone_number,
            "email": team.email,
            "members": members,
        });

        if !team.team_type.is_empty() {
            body["teamType"] = json!({ "handle": team.team_type });
        }

        self.execute(
            self.request(ctx, Method::PUT, &format!("/api/v1/teams/{}", team.id))
                .json(&body),
        )
        .await?
        .into_unit()
    }
}

#[async_trait]
impl AddTeam for Client {
    async fn add_team(&self, ctx: &Context, team: &NewTeam) -> Result<i64, ClientError> {
        let mut form = vec![
            ("email", team.email.as_str()),
            ("name", team.name.as_str()),
            ("phone", team.phone.as_str()),
            ("type", ""),
            ("teamType", ""),
        ];

        if !team.team_type.is_empty() {
            form.push(("teamType[handle]", team.team_type.as_str()));
        }

        let reply = self
            .execute(self.request(ctx, Method::POST, "/api/team").form(&form))
            .await?;

        let created: CreatedTeam = reply.into_json()?;
        Ok(created.data.id)
    }
}

#[async_trait]
impl FetchTeamTypes for Client {
    async fn team_types(&self, ctx: &Context) -> Result<Vec<TeamType>, ClientError> {
        let reply = self
            .execute(self.request(ctx, Method::GET, "/api/v1/reference-data?filter=teamType"))
            .await?;

        if !reply.is_success() {
            return Err(reply.status_error());
        }

        let reference: TeamTypeReference = reply.json()?;
        Ok(reference.team_type)
    }
}
