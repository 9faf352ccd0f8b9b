// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_SIGNUP: &str = "auth.signup";
pub const AUTH_SIGNUP_CONFLICT: &str = "auth.signup.conflict";
pub const AUTH_SIGNIN: &str = "auth.signin";
pub const AUTH_SIGNIN_FAILED: &str = "auth.signin.failed";
pub const AUTH_SIGNOUT: &str = "auth.signout";
pub const SESSION_CREATED: &str = "session.created";
