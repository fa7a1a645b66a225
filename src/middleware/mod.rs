pub mod authorize;
pub mod error_page;

pub use authorize::{require_roles, RoleGuard, SYSTEM_ADMIN};
pub use error_page::{translate_errors, ErrorPages, ErrorVars};
