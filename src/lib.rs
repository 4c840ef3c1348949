//! Huntl (Job Hunt Ledger) - a command-line job-application tracker
//!
//! This library provides the core functionality for Huntl, including:
//! - Database operations and migrations
//! - Data models for applications and pipeline stages
//! - Repository layer for data access
//! - The pipeline board core: stage grouping, drag-session state machine,
//!   edge auto-scroll, and the three board layout modes
//! - The interactive terminal board and CLI commands
//!
//! # Example
//!
//! ```no_run
//! use huntl::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod board;
pub mod cli;
pub mod db;
pub mod models;
pub mod prefs;
pub mod repo;
pub mod tui;
