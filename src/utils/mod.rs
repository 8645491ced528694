//! Utility functions and helpers
//!
//! This module contains the atomic file helpers used by snapshot persistence.

pub mod atomic;

pub use atomic::{atomic_write_bytes, durable_rename, remove_if_exists, temp_path_for, AtomicError, AtomicResult};
