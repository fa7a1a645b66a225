// Screens available to any signed-in caller
pub mod change_password;
pub mod edit_my_details;
pub mod my_details;

pub use change_password::{change_password_get, change_password_post};
pub use edit_my_details::{edit_my_details_get, edit_my_details_post};
pub use my_details::my_details;
