//! blogful - a small articles HTTP service
//!
//! CRUD over a single `blogful_articles` table, with article text
//! sanitized on the way out.

pub mod articles;
pub mod cli;
pub mod db;
pub mod http_server;
pub mod observability;
pub mod sanitize;
