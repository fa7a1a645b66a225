//! Client for the Sirius REST API.
//!
//! Every request forwards the caller's cookies and XSRF token, so the
//! platform sees the same session the browser holds. Responses are decoded
//! into typed values or classified into a [`ClientError`]:
//!
//! - 401 is always [`ClientError::Unauthorized`]
//! - other non-2xx responses with a field-error body are
//!   [`ClientError::Validation`]
//! - anything else non-2xx is a [`ClientError::Status`]
//!
//! Each platform operation is exposed as its own single-method trait
//! (`FetchTeam`, `EditTeam`, ...). Handlers bound themselves on exactly the
//! operations they call; [`Client`] implements all of them.

mod auth;
mod error;
mod my_details;
mod permissions;
mod teams;
mod users;

use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::COOKIE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::SiriusConfig;

pub use auth::{ChangePassword, ResendConfirmation};
pub use error::{ClientError, StatusError, ValidationError, ValidationErrors};
pub use my_details::{EditMyDetails, FetchMyDetails, MyDetails, MyDetailsTeam};
pub use permissions::CheckPermission;
pub use teams::{
    AddTeam, EditTeam, FetchTeam, FetchTeamTypes, FetchTeams, NewTeam, Team, TeamMember, TeamType,
};
pub use users::{
    AddUser, AuthUser, DeleteUser, EditUser, FetchUser, NewUser, SearchUsers, User, UserStatus,
};

const XSRF_HEADER: &str = "X-XSRF-TOKEN";
const BYPASS_HEADER: &str = "OPG-Bypass-Membrane";

/// Everything the admin front end needs from the platform.
pub trait Platform:
    FetchMyDetails
    + EditMyDetails
    + CheckPermission
    + ChangePassword
    + ResendConfirmation
    + SearchUsers
    + FetchUser
    + AddUser
    + EditUser
    + DeleteUser
    + FetchTeams
    + FetchTeam
    + EditTeam
    + AddTeam
    + FetchTeamTypes
    + Send
    + Sync
    + 'static
{
}

impl<T> Platform for T where
    T: FetchMyDetails
        + EditMyDetails
        + CheckPermission
        + ChangePassword
        + ResendConfirmation
        + SearchUsers
        + FetchUser
        + AddUser
        + EditUser
        + DeleteUser
        + FetchTeams
        + FetchTeam
        + EditTeam
        + AddTeam
        + FetchTeamTypes
        + Send
        + Sync
        + 'static
{
}

pub use cookie::Cookie;

/// The caller's session, scoped to a single inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Request cookies exactly as the browser sent them.
    pub cookies: Vec<Cookie<'static>>,
    pub xsrf_token: String,
}

impl Context {
    pub fn new(cookies: Vec<Cookie<'static>>, xsrf_token: impl Into<String>) -> Self {
        Self {
            cookies,
            xsrf_token: xsrf_token.into(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.value())
    }

    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|c| c.stripped().to_string())
            .collect();
        Some(pairs.join("; "))
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client with its own connection pool from configuration.
    pub fn from_config(config: &SiriusConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self::new(http, config.url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, ctx: &Context, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(BYPASS_HEADER, "1")
            .header(XSRF_HEADER, ctx.xsrf_token.as_str());

        if let Some(cookies) = ctx.cookie_header() {
            builder = builder.header(COOKIE, cookies);
        }

        builder
    }

    /// Send a request and read the whole body. A 401 short-circuits into
    /// [`ClientError::Unauthorized`]; every other status is left for the
    /// caller to inspect.
    async fn execute(&self, builder: RequestBuilder) -> Result<Reply, ClientError> {
        let request = builder.build()?;
        let method = request.method().to_string();
        let url = request.url().to_string();

        debug!(%method, %url, "sirius request");

        let response = self.http.execute(request).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }

        let body = response.bytes().await?;

        Ok(Reply {
            status,
            method,
            url,
            body,
        })
    }
}

/// A fully-read platform response.
struct Reply {
    status: StatusCode,
    method: String,
    url: String,
    body: Bytes,
}

impl Reply {
    fn is_success(&self) -> bool {
        self.status.is_success()
    }

    fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    fn status_error(self) -> ClientError {
        ClientError::Status(StatusError {
            code: self.status.as_u16(),
            method: self.method,
            url: self.url,
        })
    }

    /// Classify a non-2xx reply.
    fn into_error(self) -> ClientError {
        match ValidationError::from_body(&self.body) {
            Some(validation) => ClientError::Validation(validation),
            None => self.status_error(),
        }
    }

    /// Decode a successful JSON reply, or classify the failure.
    fn into_json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        if self.is_success() {
            self.json()
        } else {
            Err(self.into_error())
        }
    }

    /// Accept any 2xx reply, ignoring the body.
    fn into_unit(self) -> Result<(), ClientError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Client, Context, Cookie};

    pub fn client(uri: &str) -> Client {
        Client::new(reqwest::Client::new(), uri)
    }

    pub fn context() -> Context {
        Context::new(
            vec![Cookie::new("XSRF-TOKEN", "abcde"), Cookie::new("Other", "other")],
            "abcde",
        )
    }
}
