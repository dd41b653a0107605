//! Result type aliases

use crate::error::FoError;

/// Standard Result type for FieldOps operations
pub type FoResult<T> = Result<T, FoError>;
