pub type SuccessCallback<R> = Box<dyn FnOnce(&R) + Send>;
pub type ErrorCallback<E, T> = Box<dyn FnOnce(&E, &[T]) + Send>;

/// Per call hooks and messages for an optimistic operation.
///
/// `on_error` receives the collection as it was right before the optimistic
/// mutation was applied.
pub struct OperationOptions<R, T, E> {
    pub(crate) on_success: Option<SuccessCallback<R>>,
    pub(crate) on_error: Option<ErrorCallback<E, T>>,
    pub(crate) success_message: Option<String>,
    pub(crate) error_message: Option<String>,
    pub(crate) loading_message: Option<String>,
}

impl<R, T, E> Default for OperationOptions<R, T, E> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
            success_message: None,
            error_message: None,
            loading_message: None,
        }
    }
}

impl<R, T, E> OperationOptions<R, T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(mut self, callback: impl FnOnce(&R) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(&E, &[T]) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// Without a success message no success notification is emitted.
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Emits a loading notification before the operation runs and dismisses it once settled.
    pub fn loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = Some(message.into());
        self
    }
}
