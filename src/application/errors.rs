use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimisticError<K: Debug, E> {
    #[error("Item not found for update: {0:?}")]
    NotFoundForUpdate(K),

    #[error("Item not found for deletion: {0:?}")]
    NotFoundForDeletion(K),

    #[error(transparent)]
    Operation(E),
}

impl<K: Debug, E> OptimisticError<K, E> {
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OptimisticError::NotFoundForUpdate(_) | OptimisticError::NotFoundForDeletion(_)
        )
    }
}

#[cfg(test)]
mod optimistic_error_tests {
    use super::*;
    use crate::core::ports::RemoteError;
    use rstest::rstest;

    #[rstest]
    fn it_should_render_precondition_messages() {
        let update: OptimisticError<String, RemoteError> =
            OptimisticError::NotFoundForUpdate("po-9".into());
        let delete: OptimisticError<String, RemoteError> =
            OptimisticError::NotFoundForDeletion("po-9".into());
        assert_eq!(update.to_string(), "Item not found for update: \"po-9\"");
        assert_eq!(delete.to_string(), "Item not found for deletion: \"po-9\"");
        assert!(update.is_precondition());
    }

    #[rstest]
    fn it_should_be_transparent_over_operation_errors() {
        let error: OptimisticError<String, RemoteError> =
            OptimisticError::Operation(RemoteError::Offline);
        assert_eq!(error.to_string(), "remote backend offline");
        assert!(!error.is_precondition());
        assert!(matches!(error, OptimisticError::Operation(RemoteError::Offline)));
    }
}
