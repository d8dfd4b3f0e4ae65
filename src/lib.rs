//! LifeLedger - finance core of a personal life-management app
//!
//! This library records expenses and income, builds period reports,
//! projects recurring income, and keeps a reminder schedule for bills in
//! step with every bill and notification-profile edit.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, bills, recurring income, etc.)
//! - `storage`: Collaborator store traits and their JSON file implementations
//! - `services`: Business logic layer
//! - `reports`: Expense and income summaries
//! - `crypto`: Passcode hashing and secure strings
//! - `display`, `cli`: Terminal front-end
//!
//! # Example
//!
//! ```rust,ignore
//! use lifeledger::config::{LedgerPaths, Settings};
//! use lifeledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod log;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
