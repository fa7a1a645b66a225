use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{field_error, parse_id, AppState, Page};
use crate::sirius::{AuthUser, ClientError, Context, EditUser, FetchUser, ValidationErrors};
use crate::templates;

#[derive(Debug, Serialize)]
pub struct EditUserVars {
    #[serde(flatten)]
    pub page: Page,
    pub user: AuthUser,
    pub errors: Option<ValidationErrors>,
}

/// Overwrite the fields an administrator may change. Email is left alone.
fn apply_form(user: &mut AuthUser, form: &FormData) {
    user.firstname = form.value("firstname").to_string();
    user.surname = form.value("surname").to_string();
    user.organisation = form.value("organisation").to_string();
    user.roles = form.values("roles");
    user.locked = form.value("locked") == "Yes";
    user.suspended = form.value("suspended") == "Yes";
}

/// GET /edit-user/:id
pub async fn edit_user_get<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: FetchUser + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let user = state.client.user(&ctx, id).await?;

    let vars = EditUserVars {
        page: state.page(&uri, &ctx),
        user,
        errors: None,
    };

    state.render(templates::EDIT_USER, &vars)
}

/// POST /edit-user/:id
pub async fn edit_user_post<C>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: FetchUser + EditUser + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let ctx = ctx.with_form_token(&form);

    let mut user = state.client.user(&ctx, id).await?;
    user.id = id;
    apply_form(&mut user, &form);

    let errors = match state.client.edit_user(&ctx, &user).await {
        Ok(()) => return Err(AppError::redirect("/users")),
        Err(ClientError::Validation(validation)) => validation.errors,
        Err(ClientError::Message(message)) => field_error("firstname", message),
        Err(err) => return Err(err.into()),
    };

    let vars = EditUserVars {
        page: state.page(&uri, &ctx),
        user,
        errors: Some(errors),
    };

    state.render_status(StatusCode::BAD_REQUEST, templates::EDIT_USER, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sirius::StatusError;
    use crate::testing::{self, Call, MockPlatform, RecordingTemplate};
    use serde_json::json;
    use std::sync::Arc;

    const FORM: &str =
        "email=a&firstname=b&surname=c&organisation=d&roles=e&roles=f&locked=Yes&suspended=No";

    fn platform() -> MockPlatform {
        MockPlatform {
            user: AuthUser {
                id: 123,
                firstname: "test".to_string(),
                email: "test@opgtest.com".to_string(),
                suspended: true,
                ..AuthUser::default()
            },
            ..MockPlatform::default()
        }
    }

    fn edited() -> AuthUser {
        AuthUser {
            id: 123,
            firstname: "b".to_string(),
            surname: "c".to_string(),
            email: "test@opgtest.com".to_string(),
            organisation: "d".to_string(),
            roles: vec!["e".to_string(), "f".to_string()],
            locked: true,
            suspended: false,
        }
    }

    async fn post(
        platform: MockPlatform,
    ) -> (Result<Response, AppError>, Arc<MockPlatform>, Arc<RecordingTemplate>) {
        let (state, platform, template) = testing::state(platform);
        let result = edit_user_post(
            State(state),
            Path("123".to_string()),
            Uri::from_static("/edit-user/123"),
            testing::context(),
            FormData::parse(FORM, None),
        )
        .await;
        (result, platform, template)
    }

    #[tokio::test]
    async fn get_renders_user() {
        let (state, platform, template) = testing::state(platform());

        edit_user_get(
            State(state),
            Path("123".to_string()),
            Uri::from_static("/edit-user/123"),
            testing::context(),
        )
        .await
        .unwrap();

        assert_eq!(platform.calls(), vec![Call::User { id: 123 }]);
        let (page, vars) = template.last_render();
        assert_eq!(page, "edit-user");
        assert_eq!(vars["user"]["firstname"], "test");
    }

    #[tokio::test]
    async fn get_non_numeric_id_is_not_found() {
        let (state, platform, _) = testing::state(platform());

        let err = edit_user_get(
            State(state),
            Path("abc".to_string()),
            Uri::from_static("/edit-user/abc"),
            testing::context(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Status(StatusCode::NOT_FOUND)));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn post_overwrites_whitelisted_fields() {
        let (result, platform, template) = post(platform()).await;

        assert!(matches!(result, Err(AppError::Redirect(to)) if to == "/users"));
        assert_eq!(
            platform.calls(),
            vec![Call::User { id: 123 }, Call::EditUser(edited())]
        );
        assert!(template.renders().is_empty());
    }

    #[tokio::test]
    async fn post_platform_message_is_firstname_error() {
        let (result, _, template) =
            post(platform().failing("edit_user", ClientError::message("something"))).await;

        assert_eq!(result.unwrap().status(), StatusCode::BAD_REQUEST);
        let (_, vars) = template.last_render();
        assert_eq!(vars["errors"], json!({"firstname": {"": "something"}}));
        assert_eq!(vars["user"], serde_json::to_value(edited()).unwrap());
    }

    #[tokio::test]
    async fn post_other_errors_propagate() {
        let (result, _, template) = post(platform().failing(
            "edit_user",
            ClientError::Status(StatusError {
                code: 500,
                method: "PUT".to_string(),
                url: "http://sirius/auth/user/123".to_string(),
            }),
        ))
        .await;

        assert!(matches!(result, Err(AppError::Platform(ClientError::Status(_)))));
        assert!(template.renders().is_empty());
    }
}
