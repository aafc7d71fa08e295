//! In-memory batch repository collaborator for croptrace.
//!
//! This crate provides:
//! - `InMemoryBatchStore` with explicit CRUD operations
//! - Forward-only status transition enforcement
//! - The [`croptrace_core::BatchLookup`] implementation used for scan
//!   enrichment
//!
//! The store is an injected collaborator: the payload core never touches it
//! except through the single enrichment lookup, and functions fully when no
//! store is available.
//!
#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// In-memory store implementation.
pub mod memory;

pub use error::StoreError;
pub use memory::{BatchOwner, InMemoryBatchStore, StoredBatch};
