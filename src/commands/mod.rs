//! Command handlers for the CLI
//!
//! - `serve`: run the HTTP service
//! - `ask`: answer one question in the terminal

pub mod ask;
pub mod serve;
