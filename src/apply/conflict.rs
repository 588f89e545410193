//! Conflict types for server-side apply.

use crate::client::StatusCause;
use crate::fieldpath::Path;
use std::fmt;

/// ConflictCause is one field held by another manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCause {
    /// The contended field.
    pub path: Path,
    /// The manager holding the field, when the store names it.
    pub manager: Option<String>,
    /// The store's description of the conflict.
    pub message: String,
}

impl ConflictCause {
    pub fn new(path: Path, manager: Option<String>, message: impl Into<String>) -> Self {
        ConflictCause {
            path,
            manager,
            message: message.into(),
        }
    }
}

impl From<&StatusCause> for ConflictCause {
    fn from(cause: &StatusCause) -> Self {
        ConflictCause {
            path: Path::parse(&cause.field),
            manager: manager_from_message(&cause.message),
            message: cause.message.clone(),
        }
    }
}

/// Extracts `kubectl` from messages of the form `conflict with "kubectl" using apps/v1`.
fn manager_from_message(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("conflict with \"")?;
    let (manager, _) = rest.split_once('"')?;
    (!manager.is_empty()).then(|| manager.to_string())
}

impl fmt::Display for ConflictCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.manager {
            Some(manager) => write!(f, "conflict with manager '{}' at {}", manager, self.path)?,
            None => write!(f, "conflict at {}", self.path)?,
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// ServerSideApplyConflict is returned when an apply was rejected because
/// other managers own fields it would change.
///
/// The caller decides whether to retry with force or to back off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSideApplyConflict {
    message: String,
    causes: Vec<ConflictCause>,
}

impl ServerSideApplyConflict {
    pub fn new(message: impl Into<String>, causes: Vec<ConflictCause>) -> Self {
        ServerSideApplyConflict {
            message: message.into(),
            causes,
        }
    }

    /// Builds the conflict from the causes reported by the store.
    pub fn from_status_causes(message: impl Into<String>, causes: &[StatusCause]) -> Self {
        Self::new(message, causes.iter().map(ConflictCause::from).collect())
    }

    /// The store's message for the rejected request.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn causes(&self) -> &[ConflictCause] {
        &self.causes
    }

    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConflictCause> {
        self.causes.iter()
    }

    /// Distinct managers named by the causes, in order of appearance.
    pub fn managers(&self) -> Vec<&str> {
        let mut managers: Vec<&str> = Vec::new();
        for manager in self.causes.iter().filter_map(|c| c.manager.as_deref()) {
            if !managers.contains(&manager) {
                managers.push(manager);
            }
        }
        managers
    }
}

impl IntoIterator for ServerSideApplyConflict {
    type Item = ConflictCause;
    type IntoIter = std::vec::IntoIter<ConflictCause>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.into_iter()
    }
}

impl fmt::Display for ServerSideApplyConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server-side apply conflict: {}", self.message)?;
        for cause in &self.causes {
            write!(f, "\n  {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerSideApplyConflict {}
