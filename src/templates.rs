//! Page rendering.
//!
//! Handlers build a `serde::Serialize` view model and hand it to a
//! [`Template`] by page name. The bundled [`PageShell`] produces a minimal
//! HTML document carrying the view model; a real template engine slots in
//! behind the same trait.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const USERS: &str = "users";
pub const ADD_USER: &str = "add-user";
pub const EDIT_USER: &str = "edit-user";
pub const DELETE_USER: &str = "delete-user";
pub const MY_DETAILS: &str = "my-details";
pub const EDIT_MY_DETAILS: &str = "edit-my-details";
pub const CHANGE_PASSWORD: &str = "change-password";
pub const RESEND_CONFIRMATION: &str = "resend-confirmation";
pub const TEAMS: &str = "teams";
pub const TEAM: &str = "team";
pub const ADD_TEAM: &str = "add-team";
pub const EDIT_TEAM: &str = "edit-team";
pub const ADD_TEAM_MEMBER: &str = "add-team-member";
pub const REMOVE_TEAM_MEMBER: &str = "remove-team-member";
pub const ERROR: &str = "error";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown page: {0}")]
    UnknownPage(String),

    #[error("could not serialize view model: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait Template: Send + Sync {
    fn render(&self, page: &str, vars: &Value) -> Result<String, RenderError>;
}

/// Serialize a view model and render it.
pub fn render<T: Serialize>(
    template: &dyn Template,
    page: &str,
    vars: &T,
) -> Result<String, RenderError> {
    let vars = serde_json::to_value(vars)?;
    template.render(page, &vars)
}

const PAGES: [(&str, &str); 15] = [
    (USERS, "Users"),
    (ADD_USER, "Add a user"),
    (EDIT_USER, "Edit user"),
    (DELETE_USER, "Delete user"),
    (MY_DETAILS, "My details"),
    (EDIT_MY_DETAILS, "Edit my details"),
    (CHANGE_PASSWORD, "Change password"),
    (RESEND_CONFIRMATION, "Confirmation email sent"),
    (TEAMS, "Teams"),
    (TEAM, "Team"),
    (ADD_TEAM, "Add a team"),
    (EDIT_TEAM, "Edit team"),
    (ADD_TEAM_MEMBER, "Add a team member"),
    (REMOVE_TEAM_MEMBER, "Remove team members"),
    (ERROR, "Error"),
];

/// Bare HTML document with the view model embedded as JSON.
#[derive(Debug, Default, Clone)]
pub struct PageShell;

impl Template for PageShell {
    fn render(&self, page: &str, vars: &Value) -> Result<String, RenderError> {
        let title = PAGES
            .iter()
            .find(|(name, _)| *name == page)
            .map(|(_, title)| *title)
            .ok_or_else(|| RenderError::UnknownPage(page.to_string()))?;

        // `<` is escaped so the payload cannot close the script element.
        let payload = serde_json::to_string(vars)?.replace('<', "\\u003c");

        Ok(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} - Sirius</title></head>\n<body data-page=\"{page}\">\n<h1>{title}</h1>\n<script type=\"application/json\" id=\"view-model\">{payload}</script>\n</body>\n</html>\n"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_known_page_with_view_model() {
        let html = PageShell
            .render(TEAMS, &json!({"search": "</script>"}))
            .unwrap();

        assert!(html.contains("<title>Teams - Sirius</title>"));
        assert!(html.contains("data-page=\"teams\""));
        assert!(html.contains("\\u003c/script>"));
        assert!(!html.contains("\"</script>\""));
    }

    #[test]
    fn rejects_unknown_page() {
        let err = PageShell.render("nope", &json!({})).unwrap_err();
        assert!(matches!(err, RenderError::UnknownPage(page) if page == "nope"));
    }

    #[test]
    fn render_serializes_view_models() {
        #[derive(Serialize)]
        struct Vars {
            path: &'static str,
        }

        let html = render(&PageShell, ERROR, &Vars { path: "/teams" }).unwrap();
        assert!(html.contains(r#"{"path":"/teams"}"#));
    }
}
