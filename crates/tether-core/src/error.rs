use thiserror::Error;

/// Failure while manipulating the platform proxy field.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("proxy field has not been created")]
    Detached,
    #[error("platform rejected {op}: {reason}")]
    Platform { op: &'static str, reason: String },
}

impl FieldError {
    pub fn platform(op: &'static str, reason: impl Into<String>) -> Self {
        FieldError::Platform {
            op,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("UI queue is closed")]
    Closed,
}
