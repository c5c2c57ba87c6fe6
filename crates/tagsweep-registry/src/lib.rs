//! # tagsweep-registry
//!
//! Docker Registry HTTP API v2 client for tagsweep.
//!
//! Implements the [`Registry`](tagsweep_core::Registry) contract over the
//! distribution wire protocol:
//!
//! - `GET /v2/_catalog` - repository enumeration
//! - `GET /v2/{repo}/tags/list` - tag listing
//! - `HEAD /v2/{repo}/manifests/{tag}` - tag to digest resolution
//! - `DELETE /v2/{repo}/manifests/{digest}` - deletion by digest
//!
//! Deletion targets the content digest, not the tag name: the registry's
//! tag-to-digest mapping is not itself a deletable resource.
//!
//! ## Authentication
//!
//! HTTP Basic only. Credentials are optional; anonymous registries work.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod client;

pub use client::{DistributionClient, RegistryConfig};
