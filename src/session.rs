//! Session context extraction.
//!
//! The caller's cookies are forwarded untouched to the platform. The XSRF
//! token comes from the `XSRF-TOKEN` cookie on reads and from the submitted
//! `xsrfToken` field on form posts.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::form::FormData;
use crate::sirius::{Context, Cookie};

pub const XSRF_COOKIE: &str = "XSRF-TOKEN";
pub const XSRF_FIELD: &str = "xsrfToken";

fn cookie_headers(headers: &HeaderMap) -> impl Iterator<Item = &str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
}

/// Request cookies with their values left encoded, ready to forward.
/// Pairs that do not parse are skipped.
pub fn parse_cookies(headers: &HeaderMap) -> Vec<Cookie<'static>> {
    cookie_headers(headers)
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .map(Cookie::into_owned)
        .collect()
}

/// The percent-decoded XSRF token from the request cookies, if any.
fn xsrf_cookie(headers: &HeaderMap) -> Option<String> {
    cookie_headers(headers)
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(Result::ok)
        .find(|c| c.name() == XSRF_COOKIE)
        .map(|c| c.value().to_string())
}

pub fn context_from_headers(headers: &HeaderMap) -> Context {
    let xsrf_token = xsrf_cookie(headers).unwrap_or_default();
    Context::new(parse_cookies(headers), xsrf_token)
}

impl Context {
    /// The same session, authenticated by the token the form carried.
    pub fn with_form_token(&self, form: &FormData) -> Context {
        Context::new(self.cookies.clone(), form.value(XSRF_FIELD))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(context_from_headers(&parts.headers))
    }
}
