use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field name → (error code → message), exactly as the platform reports it.
pub type ValidationErrors = BTreeMap<String, BTreeMap<String, String>>;

/// Errors returned by the Sirius API client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session is missing or has expired. Always produced for a 401,
    /// whatever the body says.
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(ValidationError),

    #[error("{0}")]
    Status(StatusError),

    /// A human-readable rejection the platform wants shown to the user.
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn message(message: impl Into<String>) -> Self {
        ClientError::Message(message.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub message: String,
    pub errors: ValidationErrors,
}

impl ValidationError {
    pub fn new(errors: ValidationErrors) -> Self {
        Self {
            message: String::new(),
            errors,
        }
    }

    /// Decode one of the validation bodies the platform emits. Returns `None`
    /// when the body is not a validation response at all.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<ValidationBody>(body).ok()? {
            ValidationBody::Api {
                detail,
                validation_errors,
            } => Some(Self {
                message: detail,
                errors: validation_errors,
            }),
            ValidationBody::Legacy { error_messages } => Some(Self::new(error_messages)),
            ValidationBody::Wrapped { data } => Some(Self::new(data.error_messages)),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "validation failed")
        } else {
            write!(f, "{}", self.message)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValidationBody {
    Api {
        #[serde(default)]
        detail: String,
        validation_errors: ValidationErrors,
    },
    Legacy {
        #[serde(rename = "errorMessages")]
        error_messages: ValidationErrors,
    },
    Wrapped {
        data: WrappedErrors,
    },
}

#[derive(Deserialize)]
struct WrappedErrors {
    #[serde(rename = "errorMessages")]
    error_messages: ValidationErrors,
}

/// A non-2xx response that carried nothing more useful than its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    pub code: u16,
    pub method: String,
    pub url: String,
}

impl StatusError {
    pub fn status(&self) -> reqwest::StatusCode {
        reqwest::StatusCode::from_u16(self.code).unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} returned {}", self.method, self.url, self.code)
    }
}
