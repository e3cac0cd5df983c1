use serde::Serialize;

use crate::error::{
    invalid_input_error, password_mismatch_error, weak_password_error, Error,
};

pub const GUIDE_ROLE: &str = "GUIDE";
pub const MIN_PASSWORD_LEN: usize = 8;

/// Sign-up form of a new guide account.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    roles: &'static str,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: full_name.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            roles: GUIDE_ROLE,
        }
    }

    /// Checks run before anything is sent to the server.
    pub fn validate(&self) -> Result<(), Error> {
        if self.username.trim().is_empty() || !self.email.contains('@') {
            return Err(invalid_input_error());
        }
        if self.password != self.confirm_password {
            return Err(password_mismatch_error());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(weak_password_error());
        }

        Ok(())
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}
