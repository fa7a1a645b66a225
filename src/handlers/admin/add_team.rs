use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{AppState, Page};
use crate::sirius::{AddTeam, ClientError, Context, FetchTeamTypes, NewTeam, TeamType, ValidationErrors};
use crate::templates;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTeamVars {
    #[serde(flatten)]
    pub page: Page,
    pub team_type_options: Vec<TeamType>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub supervision_type: String,
    pub errors: Option<ValidationErrors>,
}

/// The team type handle chosen on a team form; empty means LPA.
pub fn chosen_team_type(form: &FormData) -> String {
    if form.value("service") == "supervision" {
        form.value("supervision-type").to_string()
    } else {
        String::new()
    }
}

/// GET /teams/add
pub async fn add_team_get<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
) -> Result<Response, AppError>
where
    C: FetchTeamTypes + Send + Sync + 'static,
{
    let team_type_options = state.client.team_types(&ctx).await?;

    let vars = AddTeamVars {
        page: state.page(&uri, &ctx),
        team_type_options,
        name: String::new(),
        phone: String::new(),
        email: String::new(),
        service: String::new(),
        supervision_type: String::new(),
        errors: None,
    };

    state.render(templates::ADD_TEAM, &vars)
}

/// POST /teams/add
pub async fn add_team_post<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: AddTeam + FetchTeamTypes + Send + Sync + 'static,
{
    let ctx = ctx.with_form_token(&form);

    let team = NewTeam {
        name: form.value("name").to_string(),
        team_type: chosen_team_type(&form),
        phone: form.value("phone").to_string(),
        email: form.value("email").to_string(),
    };

    let errors = match state.client.add_team(&ctx, &team).await {
        Ok(id) => return Err(AppError::redirect(format!("/teams/{id}"))),
        Err(ClientError::Validation(validation)) => validation.errors,
        Err(err) => return Err(err.into()),
    };

    let team_type_options = state.client.team_types(&ctx).await?;

    let vars = AddTeamVars {
        page: state.page(&uri, &ctx),
        team_type_options,
        name: team.name,
        phone: team.phone,
        email: team.email,
        service: form.value("service").to_string(),
        supervision_type: form.value("supervision-type").to_string(),
        errors: Some(errors),
    };

    state.render_status(StatusCode::BAD_REQUEST, templates::ADD_TEAM, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sirius::ValidationError;
    use crate::testing::{self, Call, MockPlatform};
    use serde_json::json;

    fn platform() -> MockPlatform {
        MockPlatform {
            team_types: vec![TeamType {
                handle: "FINANCE".to_string(),
                label: "Finance".to_string(),
            }],
            new_team_id: 123,
            ..MockPlatform::default()
        }
    }

    #[test]
    fn team_type_only_applies_to_supervision() {
        let form = FormData::parse("service=supervision&supervision-type=FINANCE", None);
        assert_eq!(chosen_team_type(&form), "FINANCE");

        let form = FormData::parse("service=lpa&supervision-type=FINANCE", None);
        assert_eq!(chosen_team_type(&form), "");
    }

    #[tokio::test]
    async fn get_lists_team_types() {
        let (state, platform, template) = testing::state(platform());

        add_team_get(State(state), Uri::from_static("/teams/add"), testing::context())
            .await
            .unwrap();

        assert_eq!(platform.calls(), vec![Call::TeamTypes]);
        let (page, vars) = template.last_render();
        assert_eq!(page, "add-team");
        assert_eq!(
            vars["teamTypeOptions"],
            json!([{"handle": "FINANCE", "label": "Finance"}])
        );
    }

    #[tokio::test]
    async fn post_creates_and_redirects_to_new_team() {
        let (state, platform, _) = testing::state(platform());

        let err = add_team_post(
            State(state),
            Uri::from_static("/teams/add"),
            testing::context(),
            FormData::parse(
                "name=Team&phone=0123&email=t%40opgtest.com&service=supervision&supervision-type=FINANCE",
                None,
            ),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Redirect(to) if to == "/teams/123"));
        assert_eq!(
            platform.calls(),
            vec![Call::AddTeam(NewTeam {
                name: "Team".to_string(),
                team_type: "FINANCE".to_string(),
                phone: "0123".to_string(),
                email: "t@opgtest.com".to_string(),
            })]
        );
    }

    #[tokio::test]
    async fn post_validation_error_keeps_input() {
        let errors: ValidationErrors = serde_json::from_value(json!({
            "email": {"stringLengthTooLong": "The input is more than 255 characters long"}
        }))
        .unwrap();
        let (state, platform, template) = testing::state(platform().failing(
            "add_team",
            ClientError::Validation(ValidationError::new(errors)),
        ));

        let response = add_team_post(
            State(state),
            Uri::from_static("/teams/add"),
            testing::context(),
            FormData::parse("name=Team&email=long&service=lpa", None),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(platform.calls().len(), 2);
        let (_, vars) = template.last_render();
        assert_eq!(vars["name"], "Team");
        assert_eq!(vars["service"], "lpa");
        assert!(vars["errors"]["email"].is_object());
    }
}
