use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::error::{forbidden_error, Error};

/// Credentials of a logged-in guide. Passed explicitly to the API client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(access_token: String, refresh_token: Option<String>, user: User) -> Self {
        Self {
            access_token,
            refresh_token,
            user,
            authenticated_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.authenticated_at
            .checked_add_signed(ttl)
            .map_or(false, |end| now >= end)
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    pub fn require_role(&self, role: &str) -> Result<(), Error> {
        if self.user.has_role(role) {
            return Ok(());
        }

        Err(forbidden_error(role))
    }
}

/// Persists the session between CLI invocations.
pub struct SessionStore {
    path: PathBuf,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rehydrates the stored session. Unreadable or expired sessions are dropped.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<Session>, Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable session file");
                return Ok(None);
            }
        };

        if session.is_expired(self.ttl, Utc::now()) {
            tracing::info!(user = %session.user.username, "session expired, clearing");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    #[tracing::instrument(skip(self, session), fields(user = %session.user.username))]
    pub fn save(&self, session: &Session) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;

        Ok(())
    }

    pub fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
