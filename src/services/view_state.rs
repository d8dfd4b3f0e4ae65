//! View-model state helpers
//!
//! `LoadState` is what a screen shows while data is fetched. `Liveness` lets
//! an async result find out whether the screen that asked for it is still
//! around before it is applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::LedgerError;

/// Progress of a load
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed { message: String, retryable: bool },
}

impl<T> LoadState<T> {
    /// Failed state for a load error. Repository failures can be retried.
    pub fn failed(error: &LedgerError) -> Self {
        Self::Failed {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    pub fn from_result(result: Result<T, LedgerError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::failed(&e),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Shared "still mounted" flag
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark the owner as torn down; clones observe it too
    pub fn end(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Apply `value` only while alive. Returns whether it was applied.
    pub fn apply<T>(&self, value: T, apply: impl FnOnce(T)) -> bool {
        if self.is_alive() {
            apply(value);
            true
        } else {
            false
        }
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
