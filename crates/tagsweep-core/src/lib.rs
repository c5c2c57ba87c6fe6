//! # tagsweep-core
//!
//! Core abstractions for the tagsweep registry pruning toolkit.
//!
//! This crate provides the foundational types and traits used across all
//! tagsweep components:
//!
//! - **Registry Abstraction**: The collaborator interface the retention
//!   engine speaks to, plus an in-memory fake for tests
//! - **Error Types**: Shared error definitions and result types
//! - **Observability**: Logging initialization helpers
//!
//! ## Crate Boundary
//!
//! `tagsweep-core` is the **only** crate allowed to define shared primitives.
//! The retention engine and the HTTP client both depend on the contracts
//! defined here and never on each other.
//!
//! ## Example
//!
//! ```rust
//! use tagsweep_core::prelude::*;
//!
//! let registry = MemoryRegistry::new();
//! registry.push_tag("app/api", "1.0.0", None);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod observability;
pub mod registry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use tagsweep_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::observability::{LogFormat, init_logging};
    pub use crate::registry::{MemoryRegistry, Registry};
}

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use observability::{LogFormat, init_logging};
pub use registry::{MemoryRegistry, Registry};
