// src/lib.rs
//! Job search exposed through a chat-completion shaped HTTP endpoint.
//!
//! A chat message is used as a job-search query, listings are fetched from
//! job boards and rendered into a text block returned as
//! `choices[0].message.content`.

pub mod cli;
pub mod core;
pub mod formatter;
pub mod job_search;
pub mod utils;
pub mod web;

pub use crate::core::{AppConfig, ConfigManager};
pub use formatter::render;
pub use job_search::{JobListing, JobSearch, SearchError, SearchQuery};
pub use web::{build_rocket, start_web_server, ApiError, ChatService};
