//! User accounts and cookie based sessions.

mod account;
mod cookie;
mod email;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register;
mod token;
mod user;

pub use account::{UserState, change_password, get_current_user};
pub use cookie::{
    DEFAULT_COOKIE_DURATION, REMEMBER_ME_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use email::Email;
pub use log_in::{LogInState, post_log_in};
pub use log_out::post_log_out;
pub use middleware::{AuthState, auth_guard};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{RegistrationState, register_user};
pub use user::{User, UserID, create_user, get_user_by_email, get_user_by_id, update_password};

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
