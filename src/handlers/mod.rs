// handlers/mod.rs - screens grouped by who may reach them
//
// account: any signed-in caller (/my-details, /change-password)
// admin:   callers holding an admin role, enforced by the router

pub mod account;
pub mod admin;

use std::sync::Arc;

use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;
use crate::sirius::{Context, ValidationErrors};
use crate::templates::{self, Template};

pub const SEARCH_TOO_SHORT: &str = "Search term must be at least three characters";

/// Dependencies shared by every handler.
pub struct AppState<C> {
    pub client: Arc<C>,
    pub templates: Arc<dyn Template>,
    /// Public platform URL, used for links out of the admin screens.
    pub sirius_url: String,
    pub prefix: String,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            templates: Arc::clone(&self.templates),
            sirius_url: self.sirius_url.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

impl<C> AppState<C> {
    pub fn new(
        client: Arc<C>,
        templates: Arc<dyn Template>,
        sirius_url: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            templates,
            sirius_url: sirius_url.into(),
            prefix: prefix.into(),
        }
    }

    /// Fields every page is rendered with.
    pub fn page(&self, uri: &Uri, ctx: &Context) -> Page {
        Page {
            path: uri.path().to_string(),
            sirius_url: self.sirius_url.clone(),
            xsrf_token: ctx.xsrf_token.clone(),
        }
    }

    pub fn render<T: Serialize>(&self, page: &str, vars: &T) -> Result<Response, AppError> {
        self.render_status(StatusCode::OK, page, vars)
    }

    pub fn render_status<T: Serialize>(
        &self,
        status: StatusCode,
        page: &str,
        vars: &T,
    ) -> Result<Response, AppError> {
        let body = templates::render(self.templates.as_ref(), page, vars)
            .map_err(|err| AppError::Internal(err.into()))?;

        Ok((status, Html(body)).into_response())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub path: String,
    #[serde(rename = "siriusURL")]
    pub sirius_url: String,
    #[serde(rename = "xsrfToken")]
    pub xsrf_token: String,
}

/// Parse a numeric path segment; anything else is a missing page.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::not_found())
}

/// A single error message attached to `field`.
pub fn field_error(field: &str, message: impl Into<String>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert(
        field.to_string(),
        [(String::new(), message.into())].into_iter().collect(),
    );
    errors
}

/// How a user search term should be handled.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchTerm<'a> {
    /// Nothing was entered.
    Empty,
    /// Too short to send; carries the error to show.
    TooShort,
    Valid(&'a str),
}

impl<'a> SearchTerm<'a> {
    pub fn classify(term: &'a str) -> Self {
        if term.is_empty() {
            SearchTerm::Empty
        } else if term.chars().count() < 3 {
            SearchTerm::TooShort
        } else {
            SearchTerm::Valid(term)
        }
    }

    pub fn error() -> ValidationErrors {
        field_error("search", SEARCH_TOO_SHORT)
    }
}
