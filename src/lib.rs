pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod draft;
pub mod editor;
pub mod entities;
pub mod error;
pub mod external;
pub mod fake;
pub mod script;
