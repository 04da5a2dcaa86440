pub mod google;
pub mod session;

pub const SESSION_COOKIE: &str = "spendwell_session";
pub const STATE_COOKIE: &str = "spendwell_oauth_state";
pub const FLASH_COOKIE: &str = "spendwell_flash";
