//! Store error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable reason attached to a failed store request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusReason {
    Conflict,
    NotFound,
    AlreadyExists,
    Forbidden,
    Unauthorized,
    Invalid,
    BadRequest,
    Timeout,
    TooManyRequests,
    InternalError,
    #[serde(other)]
    Unknown,
}

impl StatusReason {
    /// HTTP status code conventionally paired with this reason.
    pub fn code(self) -> u16 {
        match self {
            StatusReason::Conflict | StatusReason::AlreadyExists => 409,
            StatusReason::NotFound => 404,
            StatusReason::Forbidden => 403,
            StatusReason::Unauthorized => 401,
            StatusReason::Invalid => 422,
            StatusReason::BadRequest => 400,
            StatusReason::Timeout => 504,
            StatusReason::TooManyRequests => 429,
            StatusReason::InternalError | StatusReason::Unknown => 500,
        }
    }
}

/// Category of a single [`StatusCause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CauseType {
    FieldManagerConflict,
    FieldValueInvalid,
    FieldValueRequired,
    FieldValueNotFound,
    FieldValueDuplicate,
    #[serde(other)]
    Unknown,
}

/// StatusCause describes one reason a request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCause {
    #[serde(rename = "reason")]
    pub cause_type: CauseType,
    #[serde(default)]
    pub message: String,
    /// Path of the offending field, e.g. `.metadata.annotations`.
    #[serde(default)]
    pub field: String,
}

impl StatusCause {
    pub fn new(
        cause_type: CauseType,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StatusCause {
            cause_type,
            message: message.into(),
            field: field.into(),
        }
    }

    /// A field ownership conflict cause.
    pub fn field_manager_conflict(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(CauseType::FieldManagerConflict, field, message)
    }
}

/// Status is the failure body returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: u16,
    pub reason: StatusReason,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<StatusCause>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}): {}", self.reason, self.code, self.message)
    }
}

impl std::error::Error for Status {}

/// Capability to recognise a field ownership conflict in a store error.
///
/// Implemented by each store's error type so the applier can classify
/// conflicts without inspecting messages.
pub trait AsConflict {
    /// Returns every cause reported with the error if it is a field ownership conflict.
    fn as_conflict(&self) -> Option<Vec<StatusCause>>;
}

/// ClientError is the error type of the bundled store clients.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("{0}")]
    Status(#[from] Status),

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ClientError {
    fn status(reason: StatusReason, message: impl Into<String>, causes: Vec<StatusCause>) -> Self {
        ClientError::Status(Status {
            code: reason.code(),
            reason,
            message: message.into(),
            causes,
        })
    }

    /// A server-side apply rejection caused by fields owned by other managers.
    pub fn apply_conflict(causes: Vec<StatusCause>, message: impl Into<String>) -> Self {
        Self::status(StatusReason::Conflict, message, causes)
    }

    /// An optimistic-concurrency conflict with no field ownership causes.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::status(StatusReason::Conflict, message, Vec::new())
    }

    pub fn not_found(resource: impl fmt::Display, name: &str) -> Self {
        Self::status(
            StatusReason::NotFound,
            format!("{} \"{}\" not found", resource, name),
            Vec::new(),
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::status(StatusReason::Forbidden, message, Vec::new())
    }

    pub fn invalid(message: impl Into<String>, causes: Vec<StatusCause>) -> Self {
        Self::status(StatusReason::Invalid, message, causes)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::status(StatusReason::Timeout, message, Vec::new())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        ClientError::Serialization {
            message: message.into(),
        }
    }

    /// Reason reported by the store, if the store answered at all.
    pub fn reason(&self) -> Option<StatusReason> {
        match self {
            ClientError::Status(status) => Some(status.reason),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reason() == Some(StatusReason::NotFound)
    }
}

impl AsConflict for ClientError {
    fn as_conflict(&self) -> Option<Vec<StatusCause>> {
        let ClientError::Status(status) = self else {
            return None;
        };
        let owned_elsewhere = status
            .causes
            .iter()
            .any(|c| c.cause_type == CauseType::FieldManagerConflict);
        (status.reason == StatusReason::Conflict && owned_elsewhere).then(|| status.causes.clone())
    }
}
