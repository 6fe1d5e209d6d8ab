//! precis — client for a document summarization service.
//!
//! Submits local files or raw text to an external server as multipart
//! requests and renders the returned summaries (plus an optional pairwise
//! similarity matrix) as a terminal table, an HTML report, or raw JSON.

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod history;
pub mod render;
