//! taskdeck - Task Tracking Library
//!
//! This library provides the core functionality for the taskdeck CLI: a
//! single-user, single-process task tracker with snapshot persistence and an
//! append-only audit trail.
//!
//! # Core Concepts
//!
//! - **Records**: validated tasks (title, description, priority, status, due date)
//! - **Registry**: the in-memory id → record mapping plus the id counter
//! - **Snapshot**: one JSON file rewritten in full after every mutation
//! - **Audit trail**: three append-only text logs for actions, errors, and data
//!
//! # Module Organization
//!
//! - `cli`: command-line interface and interactive menu using clap
//! - `config`: configuration loading from `taskdeck.toml`
//! - `error`: error types and result aliases
//! - `task`: record type, priority/status enums, validation
//! - `registry`: registry operations and capacity enforcement
//! - `store`: snapshot load/save
//! - `audit`: audit log files and the timing wrapper

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod store;
pub mod task;

pub use error::{Error, Result};
