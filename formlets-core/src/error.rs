use std::fmt;

/// Contract violations raised while building, evaluating or rendering formlets.
///
/// Validation failures never show up here: they are reified into error values
/// (see [`crate::Value::error`]) and rendered back to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormletError {
    #[error("Can't get value from {what}")]
    NotGettable { what: &'static str },

    #[error("Can't apply {what} to a value")]
    NotApplicable { what: &'static str },

    #[error("{what} carries no error")]
    NoError { what: &'static str },

    #[error("Arity mismatch for {function}: expected at most {expected} arguments, got {got}")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("Kind mismatch: expected {expected}, got {got}")]
    KindMismatch { expected: String, got: String },

    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    #[error("Missing input for field {name}")]
    MissingInput { name: String },

    #[error("{function} raised unhandled {kind} error: {message}")]
    Unhandled {
        function: String,
        kind: ErrorKind,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, FormletError>;

/// Category of a failure raised by a callable inside a function value.
///
/// A function value only turns a raised failure into an error value when its
/// kind has been registered with [`crate::Value::reify_on`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingInput,
    InvalidInput,
    Contract,
    Custom(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingInput => write!(f, "missing-input"),
            ErrorKind::InvalidInput => write!(f, "invalid-input"),
            ErrorKind::Contract => write!(f, "contract"),
            ErrorKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// A failure raised by a callable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Raised {
    pub kind: ErrorKind,
    pub message: String,
}

impl Raised {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn contract<S: Into<String>>(message: S) -> Self {
        Self::new(ErrorKind::Contract, message)
    }
}

impl From<FormletError> for Raised {
    fn from(err: FormletError) -> Self {
        match err {
            FormletError::MissingInput { .. } => {
                Raised::new(ErrorKind::MissingInput, err.to_string())
            }
            FormletError::Unhandled { kind, message, .. } => Raised::new(kind, message),
            other => Raised::contract(other.to_string()),
        }
    }
}
