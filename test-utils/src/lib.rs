//! Shared test utilities for lava-client.
//!
//! This crate provides:
//! - Identity service fixtures with sample tokens and catalogs
//! - Proptest generators for request paths and headers
//! - Wiremock helpers standing in for the identity service

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
