use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::session::context_from_headers;
use crate::sirius::{Context, FetchMyDetails};

/// Roles that may use the user and team administration screens.
pub const SYSTEM_ADMIN: &[&str] = &["System Admin"];

/// Admits callers holding at least one of the allowed roles.
pub struct RoleGuard<C> {
    client: Arc<C>,
    allowed: &'static [&'static str],
}

impl<C> Clone for RoleGuard<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            allowed: self.allowed,
        }
    }
}

impl<C> RoleGuard<C>
where
    C: FetchMyDetails + Send + Sync,
{
    pub fn new(client: Arc<C>, allowed: &'static [&'static str]) -> Self {
        Self { client, allowed }
    }

    /// Look up the caller's roles. Nothing is cached between requests, so a
    /// revoked role takes effect immediately.
    pub async fn check(&self, ctx: &Context) -> Result<(), AppError> {
        let details = self.client.my_details(ctx).await?;

        if self.allowed.iter().any(|role| details.has_role(role)) {
            Ok(())
        } else {
            tracing::debug!(user_id = details.id, "caller lacks a permitted role");
            Err(AppError::forbidden())
        }
    }
}

/// Route layer enforcing a [`RoleGuard`] before the handler runs.
pub async fn require_roles<C>(
    State(guard): State<RoleGuard<C>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError>
where
    C: FetchMyDetails + Send + Sync + 'static,
{
    let ctx = context_from_headers(request.headers());
    guard.check(&ctx).await?;
    Ok(next.run(request).await)
}
