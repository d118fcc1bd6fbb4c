//! Folio core: the intent & context engine behind the portfolio chat, and the
//! two-layer project cache in front of the GitHub API.

pub mod cache;
pub mod chat;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod model;
pub mod projects;
