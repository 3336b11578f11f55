//! `dlp-risk` library crate.
//!
//! Re-exports the argument and configuration modules for testing. The
//! binary entrypoint lives in `main.rs`.

pub mod args;
pub mod config;
