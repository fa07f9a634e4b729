use alloc::collections::TryReserveError;
use core::fmt;

/// Which of the two rebalancing passes hit an impossible configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixup {
    Insert,
    Remove,
}

impl fmt::Display for Fixup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fixup::Insert => write!(f, "insertion"),
            Fixup::Remove => write!(f, "removal"),
        }
    }
}

/// Buffer that failed the width check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Key,
    Payload,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Key => write!(f, "Key"),
            Operand::Payload => write!(f, "Payload"),
        }
    }
}

/// Broad origin of an [`EbonyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caused by the arguments. The tree is left untouched.
    User,
    /// A broken invariant inside the tree. The tree must not be used afterwards.
    Internal,
    /// The environment refused a resource. The tree is left in its pre-call state.
    Environment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EbonyError {
    KeyNotFound,
    WidthMismatch {
        what: Operand,
        expected: usize,
        actual: usize,
    },
    InvalidState(Fixup),
    AllocationFailure(TryReserveError),
}

impl EbonyError {
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            EbonyError::KeyNotFound | EbonyError::WidthMismatch { .. } => ErrorClass::User,
            EbonyError::InvalidState(_) => ErrorClass::Internal,
            EbonyError::AllocationFailure(_) => ErrorClass::Environment,
        }
    }

    /// Stable numeric code. The hundreds digit encodes the [`ErrorClass`].
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            EbonyError::KeyNotFound => 1101,
            EbonyError::WidthMismatch { .. } => 1102,
            EbonyError::InvalidState(_) => 1201,
            EbonyError::AllocationFailure(_) => 1300,
        }
    }
}

impl From<TryReserveError> for EbonyError {
    fn from(err: TryReserveError) -> Self {
        Self::AllocationFailure(err)
    }
}

impl fmt::Display for EbonyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EbonyError::KeyNotFound => write!(f, "Key not found."),
            EbonyError::WidthMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what} is {actual} bytes, tree expects {expected}."),
            EbonyError::InvalidState(fixup) => write!(
                f,
                "Red-black tree entered an invalid state during {fixup} fixup."
            ),
            EbonyError::AllocationFailure(err) => write!(f, "Internal allocation failed: {err}"),
        }
    }
}

impl std::error::Error for EbonyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EbonyError::AllocationFailure(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, EbonyError>;
