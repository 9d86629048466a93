use anyhow::Context as _;

/// Failures of the rating engine itself. Every variant aborts the run;
/// no partial ranking is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid contest record #{position}: {entity} cannot play against itself")]
    InvalidRecord { position: usize, entity: String },

    #[error("Insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error(
        "Numerical instability while solving {entity_count} entities over {comparison_count} comparisons: {reason}"
    )]
    NumericalInstability {
        entity_count: usize,
        comparison_count: usize,
        reason: String,
    },
}

impl RatingError {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        RatingError::InsufficientData {
            reason: reason.into(),
        }
    }
}

/// Add context to input loading errors
pub fn load_context(path: &str) -> String {
    format!("Failed to load contest records from: {}", path)
}

/// Add context to storage errors
pub fn storage_context(operation: &str, table: &str) -> String {
    format!("Failed to {} table: {}", operation, table)
}

/// Wrap result with input loading context
pub fn with_load_context<T, E>(result: Result<T, E>, path: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(load_context(path))
}

/// Wrap result with storage context
pub fn with_storage_context<T, E>(result: Result<T, E>, operation: &str, table: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(storage_context(operation, table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerical_instability_carries_sizes() {
        let err = RatingError::NumericalInstability {
            entity_count: 12,
            comparison_count: 80,
            reason: "singular generator".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("12 entities"));
        assert!(message.contains("80 comparisons"));
        assert!(message.contains("singular generator"));
    }

    #[test]
    fn test_rating_error_survives_anyhow() {
        let err: anyhow::Error = RatingError::insufficient("no comparisons").into();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::InsufficientData { .. })
        ));
    }
}
