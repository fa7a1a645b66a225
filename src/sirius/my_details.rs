use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Client, ClientError, Context};

/// The signed-in caller, as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyDetails {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub teams: Vec<MyDetailsTeam>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub suspended: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyDetailsTeam {
    #[serde(default)]
    pub display_name: String,
}

/// Roles that name the caller's organisation rather than a permission.
const ORGANISATION_ROLES: [&str; 2] = ["COP User", "OPG User"];

impl MyDetails {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Split the role list into the organisation and the remaining roles.
    pub fn organisation_and_roles(&self) -> (String, Vec<String>) {
        let mut organisation = String::new();
        let mut roles = Vec::with_capacity(self.roles.len());

        for role in &self.roles {
            if ORGANISATION_ROLES.contains(&role.as_str()) {
                organisation = role.clone();
            } else {
                roles.push(role.clone());
            }
        }

        (organisation, roles)
    }
}

#[async_trait]
pub trait FetchMyDetails {
    async fn my_details(&self, ctx: &Context) -> Result<MyDetails, ClientError>;
}

#[async_trait]
pub trait EditMyDetails {
    async fn edit_my_details(
        &self,
        ctx: &Context,
        id: i64,
        phone_number: &str,
    ) -> Result<(), ClientError>;
}

#[async_trait]
impl FetchMyDetails for Client {
    async fn my_details(&self, ctx: &Context) -> Result<MyDetails, ClientError> {
        let reply = self
            .execute(self.request(ctx, Method::GET, "/api/v1/users/current"))
            .await?;

        if !reply.is_success() {
            return Err(reply.status_error());
        }

        reply.json()
    }
}

#[async_trait]
impl EditMyDetails for Client {
    async fn edit_my_details(
        &self,
        ctx: &Context,
        id: i64,
        phone_number: &str,
    ) -> Result<(), ClientError> {
        self.execute(
            self.request(
                ctx,
                Method::PUT,
                &format!("/api/v1/users/{id}/updateTelephoneNumber"),
            )
            .json(&json!({ "phoneNumber": phone_number })),
        )
        .await?
        .into_unit()
    }
}
