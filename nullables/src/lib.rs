//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Never touch the filesystem
//!
//! Usage: swap the LMDB store for [`NullStore`] in tests and in-memory runs.

pub mod store;

pub use store::NullStore;
