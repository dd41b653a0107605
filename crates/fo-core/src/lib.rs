//! # fo-core
//!
//! Core types, traits, and utilities for FieldOps.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Error taxonomy for status transitions, geolocation and submission
//! - Result type aliases
//! - Core traits (Identifiable, Timestamped)
//! - Configuration types

pub mod error;
pub mod result;
pub mod traits;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
