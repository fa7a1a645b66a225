use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Client, ClientError, Context};

/// A user as shown in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UserStatus {
    Active,
    Suspended,
    Locked,
}

impl UserStatus {
    pub fn from_flags(locked: bool, suspended: bool) -> Self {
        if locked {
            UserStatus::Locked
        } else if suspended {
            UserStatus::Suspended
        } else {
            UserStatus::Active
        }
    }

    /// GOV.UK tag modifier for the status badge.
    pub fn tag_colour(&self) -> &'static str {
        match self {
            UserStatus::Locked => "govuk-tag--orange",
            UserStatus::Suspended => "govuk-tag--grey",
            UserStatus::Active => "",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UserStatus::Active => "Active",
            UserStatus::Suspended => "Suspended",
            UserStatus::Locked => "Locked",
        };
        f.write_str(label)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiUser {
    id: i64,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    suspended: bool,
}

impl From<ApiUser> for User {
    fn from(user: ApiUser) -> Self {
        User {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            status: UserStatus::from_flags(user.locked, user.suspended),
        }
    }
}

/// The editable account record held by the auth service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organisation: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub suspended: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub firstname: String,
    pub surname: String,
    pub organisation: String,
    pub roles: Vec<String>,
}

#[async_trait]
pub trait SearchUsers {
    async fn search_users(&self, ctx: &Context, term: &str) -> Result<Vec<User>, ClientError>;
}

#[async_trait]
pub trait FetchUser {
    async fn user(&self, ctx: &Context, id: i64) -> Result<AuthUser, ClientError>;
}

#[async_trait]
pub trait AddUser {
    async fn add_user(&self, ctx: &Context, user: &NewUser) -> Result<(), ClientError>;
}

#[async_trait]
pub trait EditUser {
    async fn edit_user(&self, ctx: &Context, user: &AuthUser) -> Result<(), ClientError>;
}

#[async_trait]
pub trait DeleteUser {
    async fn delete_user(&self, ctx: &Context, id: i64) -> Result<(), ClientError>;
}

fn role_pairs(roles: &[String]) -> impl Iterator<Item = (&'static str, &str)> {
    roles.iter().map(|role| ("roles[]", role.as_str()))
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[async_trait]
impl SearchUsers for Client {
    async fn search_users(&self, ctx: &Context, term: &str) -> Result<Vec<User>, ClientError> {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("query", term)
            .finish();

        let reply = self
            .execute(self.request(ctx, Method::GET, &format!("/api/v1/search/users?{query}")))
            .await?;

        if !reply.is_success() {
            return Err(reply.status_error());
        }

        let users: Vec<ApiUser> = reply.json()?;
        Ok(users.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl FetchUser for Client {
    async fn user(&self, ctx: &Context, id: i64) -> Result<AuthUser, ClientError> {
        self.execute(self.request(ctx, Method::GET, &format!("/auth/user/{id}")))
            .await?
            .into_json()
    }
}

#[async_trait]
impl AddUser for Client {
    async fn add_user(&self, ctx: &Context, user: &NewUser) -> Result<(), ClientError> {
        let mut form = vec![
            ("email", user.email.as_str()),
            ("firstname", user.firstname.as_str()),
            ("surname", user.surname.as_str()),
            ("organisation", user.organisation.as_str()),
        ];
        form.extend(role_pairs(&user.roles));

        self.execute(self.request(ctx, Method::POST, "/auth/user").form(&form))
            .await?
            .into_unit()
    }
}

#[async_trait]
impl EditUser for Client {
    async fn edit_user(&self, ctx: &Context, user: &AuthUser) -> Result<(), ClientError> {
        let mut form = vec![
            ("firstname", user.firstname.as_str()),
            ("surname", user.surname.as_str()),
            ("organisation", user.organisation.as_str()),
        ];
        form.extend(role_pairs(&user.roles));
        form.push(("locked", flag(user.locked)));
        form.push(("suspended", flag(user.suspended)));

        self.execute(
            self.request(ctx, Method::PUT, &format!("/auth/user/{}", user.id))
                .form(&form),
        )
        .await?
        .into_unit()
    }
}

#[async_trait]
impl DeleteUser for Client {
    async fn delete_user(&self, ctx: &Context, id: i64) -> Result<(), ClientError> {
        self.execute(self.request(ctx, Method::DELETE, &format!("/auth/user/{id}")))
            .await?
            .into_unit()
    }
}
