mod bootstrap;
mod session;

pub use bootstrap::bootstrap_handler;
pub use session::{effective_permissions_handler, logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
