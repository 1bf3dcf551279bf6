//! Common result and error types for the FIR toolkit.

/// The standard result type for operations that can hit a structural IR defect.
///
/// `Err` carries an [`IrError`]. Problems with user input that can be reported
/// and survived (parse errors, validation findings) go through the diagnostic
/// sink instead and never reach this type.
pub type FirResult<T> = Result<T, IrError>;

/// A structural defect in an IR tree or in a request made against it.
///
/// Raised at the point of detection, for example when an annotation is rebound
/// to a target of the wrong kind or when a node does not have the shape an
/// operation requires. The IR never raises it at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("IR error: {message}")]
pub struct IrError {
    /// Description of the defect.
    pub message: String,
}

impl IrError {
    /// Creates a new IR error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for IrError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for IrError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
