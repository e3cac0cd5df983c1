use std::env;
use std::fmt::{self, Debug, Display};
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    /// Caller errors carry codes from 100 up; anything below is an internal failure.
    pub fn is_caller_error(&self) -> bool {
        self.code >= 100
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        serialization_error(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        io_error(err)
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn unknown_waypoint_error() -> Error {
    Error {
        code: 102,
        message: "unknown waypoint".into(),
    }
}

pub fn invalid_coordinates_error(latitude: f64, longitude: f64) -> Error {
    Error {
        code: 103,
        message: format!("invalid coordinates ({}, {})", latitude, longitude),
    }
}

pub fn invalid_config_error(name: &str) -> Error {
    Error {
        code: 104,
        message: format!("invalid configuration value for {}", name),
    }
}

pub fn unauthenticated_error() -> Error {
    Error {
        code: 105,
        message: "not logged in".into(),
    }
}

pub fn graphql_error(message: impl Into<String>) -> Error {
    Error {
        code: 106,
        message: message.into(),
    }
}

pub fn password_mismatch_error() -> Error {
    Error {
        code: 107,
        message: "passwords do not match".into(),
    }
}

pub fn weak_password_error() -> Error {
    Error {
        code: 108,
        message: "password must be at least 8 characters".into(),
    }
}

pub fn forbidden_error(role: &str) -> Error {
    Error {
        code: 109,
        message: format!("the {} role is required", role),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn io_error(err: io::Error) -> Error {
    Error {
        code: 2,
        message: format!("io error: {}", err),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn serialization_error<T: Debug>(_: T) -> Error {
    Error {
        code: 5,
        message: "serialization error".into(),
    }
}
