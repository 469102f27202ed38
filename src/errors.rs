// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error taxonomy for the verification pipeline.
//!
//! Every pipeline operation returns one of these variants and propagates it
//! unchanged to the caller. The only failure that is ever swallowed is
//! post-commit notification dispatch, which is logged by the caller instead.

use uuid::Uuid;

/// Errors surfaced by pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// The operation is illegal for the entity's current lifecycle state.
    /// Also covers a lost optimistic-concurrency race: the loser of two
    /// racing transitions observes this variant.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Missing or out-of-range input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The persistence gateway failed. Never retried inside the core;
    /// retry policy belongs to the caller.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl PipelineError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        PipelineError::NotFound { entity, id }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let id = Uuid::nil();
        let err = PipelineError::not_found("submission", id);
        assert!(err.to_string().contains("submission not found"));

        let err = PipelineError::InvalidState("submission is already approved".to_string());
        assert!(err.to_string().starts_with("invalid state"));

        let err = PipelineError::Validation("rejection reason is required".to_string());
        assert!(err.to_string().contains("rejection reason"));
    }
}
