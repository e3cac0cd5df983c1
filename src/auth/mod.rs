mod registration;
mod session;
mod user;

pub use registration::{Registration, GUIDE_ROLE, MIN_PASSWORD_LEN};
pub use session::{Session, SessionStore};
pub use user::User;
