//! OSAL status codes.
//!
//! Every fallible operation returns [`OsalResult`]. The numeric codes match
//! the portable OSAL API so callers that log or compare raw codes keep working.

use std::fmt;

/// Status code returned for a successful operation.
pub const OS_SUCCESS: i32 = 0;

/// Result alias used throughout the abstraction layer.
pub type OsalResult<T> = Result<T, OsalError>;

/// Failure statuses reported by the abstraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsalError {
    /// Generic failure, including a shell command that exited nonzero.
    Error,
    /// A required argument was absent (empty command, missing buffer).
    InvalidPointer,
    /// The handle table has no free slot.
    NoFreeIds,
    /// The id is not currently allocated, is stale, or has the wrong type.
    InvalidId,
    /// A host file operation failed.
    File,
    /// The selected backend does not provide this operation.
    NotImplemented,
    /// The path exceeds the configured maximum length.
    PathTooLong,
    /// The path is empty or malformed.
    PathInvalid,
}

impl OsalError {
    /// Returns the numeric OSAL status code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Error => -1,
            Self::InvalidPointer => -2,
            Self::NoFreeIds => -14,
            Self::InvalidId => -16,
            Self::File => -27,
            Self::NotImplemented => -28,
            Self::PathTooLong => -103,
            Self::PathInvalid => -108,
        }
    }

    /// Returns the OSAL constant name for this status.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "OS_ERROR",
            Self::InvalidPointer => "OS_INVALID_POINTER",
            Self::NoFreeIds => "OS_ERR_NO_FREE_IDS",
            Self::InvalidId => "OS_ERR_INVALID_ID",
            Self::File => "OS_ERR_FILE",
            Self::NotImplemented => "OS_ERR_NOT_IMPLEMENTED",
            Self::PathTooLong => "OS_FS_ERR_PATH_TOO_LONG",
            Self::PathInvalid => "OS_FS_ERR_PATH_INVALID",
        }
    }

    /// Looks up the status for a numeric code. `OS_SUCCESS` and unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        [
            Self::Error,
            Self::InvalidPointer,
            Self::NoFreeIds,
            Self::InvalidId,
            Self::File,
            Self::NotImplemented,
            Self::PathTooLong,
            Self::PathInvalid,
        ]
        .into_iter()
        .find(|e| e.code() == code)
    }
}

impl fmt::Display for OsalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl std::error::Error for OsalError {}

/// Maps a result to its numeric status code, `OS_SUCCESS` for `Ok`.
pub fn status_code<T>(result: &OsalResult<T>) -> i32 {
    match result {
        Ok(_) => OS_SUCCESS,
        Err(e) => e.code(),
    }
}
