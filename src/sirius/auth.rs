use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use super::{Client, ClientError, Context};

#[async_trait]
pub trait ChangePassword {
    async fn change_password(
        &self,
        ctx: &Context,
        existing_password: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), ClientError>;
}

#[async_trait]
pub trait ResendConfirmation {
    async fn resend_confirmation(&self, ctx: &Context, email: &str) -> Result<(), ClientError>;
}

/// Rejections from the auth service come back as a single message.
#[derive(Deserialize)]
struct AuthRejection {
    errors: String,
}

#[async_trait]
impl ChangePassword for Client {
    async fn change_password(
        &self,
        ctx: &Context,
        existing_password: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), ClientError> {
        let form = [
            ("existingPassword", existing_password),
            ("password", password),
            ("confirmPassword", confirm_password),
        ];

        let reply = self
            .execute(self.request(ctx, Method::POST, "/auth/change-password").form(&form))
            .await?;

        if reply.is_success() {
            return Ok(());
        }

        match serde_json::from_slice::<AuthRejection>(&reply.body) {
            Ok(rejection) => Err(ClientError::Message(rejection.errors)),
            Err(_) => Err(reply.status_error()),
        }
    }
}

#[async_trait]
impl ResendConfirmation for Client {
    async fn resend_confirmation(&self, ctx: &Context, email: &str) -> Result<(), ClientError> {
        let reply = self
            .execute(
                self.request(ctx, Method::POST, "/auth/resend-confirmation")
                    .form(&[("email", email)]),
            )
            .await?;

        if reply.is_success() {
            Ok(())
        } else {
            Err(reply.status_error())
        }
    }
}
