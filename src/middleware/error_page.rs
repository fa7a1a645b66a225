use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::LOCATION, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{AppError, UntranslatedError};
use crate::templates::{self, Template};

/// What the error page is rendered with.
#[derive(Debug, Serialize)]
pub struct ErrorVars {
    #[serde(rename = "siriusURL")]
    pub sirius_url: String,
    pub path: String,
    pub code: u16,
    pub error: String,
}

/// Turns handler errors into redirects and rendered error pages.
#[derive(Clone)]
pub struct ErrorPages {
    templates: Arc<dyn Template>,
    sirius_public_url: String,
    prefix: String,
}

impl ErrorPages {
    pub fn new(
        templates: Arc<dyn Template>,
        sirius_public_url: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            sirius_public_url: sirius_public_url.into(),
            prefix: prefix.into(),
        }
    }

    pub fn respond(&self, handler: &str, path: &str, err: &AppError) -> Response {
        match err {
            AppError::Unauthorized => found(format!("{}/auth", self.sirius_public_url)),
            AppError::Redirect(target) => found(format!("{}{}", self.prefix, target)),
            _ => {
                let status = err.page_status();

                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(handler, path, error = %err, "request failed");
                } else {
                    tracing::debug!(handler, path, error = %err, "request refused");
                }

                self.page(handler, path, status)
            }
        }
    }

    fn page(&self, handler: &str, path: &str, status: StatusCode) -> Response {
        let vars = ErrorVars {
            sirius_url: self.sirius_public_url.clone(),
            path: path.to_string(),
            code: status.as_u16(),
            error: status.to_string(),
        };

        match templates::render(self.templates.as_ref(), templates::ERROR, &vars) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!(handler, error = %err, "could not render error page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not generate error template",
                )
                    .into_response()
            }
        }
    }
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// Replace any response produced from an [`AppError`] with its final form.
pub async fn translate_errors(
    State(pages): State<ErrorPages>,
    matched: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let handler = matched
        .as_ref()
        .map(MatchedPath::as_str)
        .unwrap_or("fallback")
        .to_string();

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<UntranslatedError>() {
        Some(UntranslatedError(err)) => pages.respond(&handler, &path, &err),
        None => response,
    }
}
