use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use super::{Client, ClientError, Context};

/// Whether the caller may perform `method` against a permission `group`,
/// e.g. `("team", "post")`.
#[async_trait]
pub trait CheckPermission {
    async fn has_permission(
        &self,
        ctx: &Context,
        group: &str,
        method: &str,
    ) -> Result<bool, ClientError>;
}

#[derive(Debug, Default, Deserialize)]
struct PermissionGroup {
    #[serde(default)]
    permissions: Vec<String>,
}

type PermissionSet = HashMap<String, PermissionGroup>;

fn permits(set: &PermissionSet, group: &str, method: &str) -> bool {
    set.get(group)
        .map(|g| g.permissions.iter().any(|p| p.eq_ignore_ascii_case(method)))
        .unwrap_or(false)
}

#[async_trait]
impl CheckPermission for Client {
    async fn has_permission(
        &self,
        ctx: &Context,
        group: &str,
        method: &str,
    ) -> Result<bool, ClientError> {
        let reply = self
            .execute(self.request(ctx, Method::GET, "/api/v1/permissions"))
            .await?;

        if !reply.is_success() {
            return Err(reply.status_error());
        }

        let set: PermissionSet = reply.json()?;
        Ok(permits(&set, group, method))
    }
}
