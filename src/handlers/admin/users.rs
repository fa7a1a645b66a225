use axum::{extract::State, http::Uri, response::Response};
use serde::Serialize;

use crate::error::AppError;
use crate::form::FormData;
use crate::handlers::{AppState, Page, SearchTerm};
use crate::sirius::{Context, SearchUsers, User, ValidationErrors};
use crate::templates;

/// A search result row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: i64,
    pub display_name: String,
    pub email: String,
    pub status: String,
    pub status_colour: &'static str,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            status: user.status.to_string(),
            status_colour: user.status.tag_colour(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListUsersVars {
    #[serde(flatten)]
    pub page: Page,
    pub search: String,
    pub users: Vec<UserRow>,
    pub errors: Option<ValidationErrors>,
}

/// Run a user search if the term is long enough, returning either the
/// results or the error to show against the search field.
pub async fn search<C>(
    client: &C,
    ctx: &Context,
    term: &str,
) -> Result<(Vec<User>, Option<ValidationErrors>), AppError>
where
    C: SearchUsers + Send + Sync,
{
    match SearchTerm::classify(term) {
        SearchTerm::Empty => Ok((Vec::new(), None)),
        SearchTerm::TooShort => Ok((Vec::new(), Some(SearchTerm::error()))),
        SearchTerm::Valid(term) => Ok((client.search_users(ctx, term).await?, None)),
    }
}

/// GET /users
pub async fn list_users<C>(
    State(state): State<AppState<C>>,
    uri: Uri,
    ctx: Context,
    form: FormData,
) -> Result<Response, AppError>
where
    C: SearchUsers + Send + Sync + 'static,
{
    let term = form.value("search");
    let (users, errors) = search(state.client.as_ref(), &ctx, term).await?;

    let vars = ListUsersVars {
        page: state.page(&uri, &ctx),
        search: term.to_string(),
        users: users.into_iter().map(UserRow::from).collect(),
        errors,
    };

    state.render(templates::USERS, &vars)
}
