//! Graph-level error types.

use thiserror::Error;

use crate::graph::resource::ResourceId;

/// Errors from resource graph construction.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("duplicate resource id: {0}")]
    DuplicateResource(ResourceId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn error_display() {
        let err = GraphError::DuplicateResource(Uuid::nil());
        assert!(err.to_string().contains("duplicate resource id"));
    }
}
