//! Base contract system

use fo_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity, collecting every failing field
    fn validate(&self, entity: &T) -> ValidationResult;
}
