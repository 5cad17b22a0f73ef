use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage operation timed out: {0}")]
    Timeout(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl StoreError {
    /// Whether retrying the same operation later can succeed.
    ///
    /// Transient failures leave the inbound message in the delivery queue;
    /// everything else is terminal for that message.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_infrastructure_failures_are_transient() {
        assert!(StoreError::Unavailable("down".into()).is_transient());
        assert!(StoreError::Timeout("slow".into()).is_transient());
        assert!(!StoreError::NotFound("x".into()).is_transient());
        assert!(!StoreError::Serialization("bad".into()).is_transient());
        assert!(!StoreError::Corruption("bad page".into()).is_transient());
    }
}
