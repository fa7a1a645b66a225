// Screens behind the admin role guard
pub mod add_member;
pub mod add_team;
pub mod add_user;
pub mod delete_user;
pub mod edit_team;
pub mod edit_user;
pub mod remove_member;
pub mod resend_confirmation;
pub mod teams;
pub mod users;

pub use add_member::{add_member_get, add_member_post};
pub use add_team::{add_team_get, add_team_post};
pub use add_user::{add_user_get, add_user_post};
pub use delete_user::{delete_user_get, delete_user_post};
pub use edit_team::{edit_team_get, edit_team_post};
pub use edit_user::{edit_user_get, edit_user_post};
pub use remove_member::remove_member;
pub use resend_confirmation::{resend_confirmation_get, resend_confirmation_post};
pub use teams::{list_teams, view_team};
pub use users::list_users;
