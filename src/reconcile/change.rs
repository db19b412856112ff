//! Per-path difference between the file system and the index

use serde::Serialize;
use std::fmt;

use crate::error::ChangeError;
use crate::fingerprint::Fingerprint;

/// How the two sides of a [`Change`] relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// On disk, not in the index
    LeftOnly,
    /// In the index, no longer on disk
    RightOnly,
    Same,
    LeftNewer,
    /// Index claims a newer mtime than the file. Still overwritten from disk.
    RightNewer,
    /// Same second, different size
    Conflict,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::LeftOnly => "left_only",
            ChangeStatus::RightOnly => "right_only",
            ChangeStatus::Same => "same",
            ChangeStatus::LeftNewer => "left_newer",
            ChangeStatus::RightNewer => "right_newer",
            ChangeStatus::Conflict => "conflict",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File-system side (`left`) and index side (`right`) for one path
///
/// At least one side is present and, when both are, they share a path.
/// Values that break this cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    path: String,
    left: Option<Fingerprint>,
    right: Option<Fingerprint>,
}

impl Change {
    pub fn new(
        left: Option<Fingerprint>,
        right: Option<Fingerprint>,
    ) -> Result<Self, ChangeError> {
        let path = match (&left, &right) {
            (Some(l), Some(r)) if l.path != r.path => {
                return Err(ChangeError::PathMismatch {
                    left: l.path.clone(),
                    right: r.path.clone(),
                });
            }
            (Some(l), _) => l.path.clone(),
            (None, Some(r)) => r.path.clone(),
            (None, None) => return Err(ChangeError::Empty),
        };

        Ok(Self { path, left, right })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn left(&self) -> Option<&Fingerprint> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Fingerprint> {
        self.right.as_ref()
    }

    pub fn status(&self) -> ChangeStatus {
        match (&self.left, &self.right) {
            (Some(_), None) => ChangeStatus::LeftOnly,
            (None, Some(_)) => ChangeStatus::RightOnly,
            (Some(left), Some(right)) => {
                if left == right {
                    ChangeStatus::Same
                } else if left.modified_seconds > right.modified_seconds {
                    ChangeStatus::LeftNewer
                } else if left.modified_seconds < right.modified_seconds {
                    ChangeStatus::RightNewer
                } else {
                    ChangeStatus::Conflict
                }
            }
            // Ruled out by the constructor
            (None, None) => unreachable!("change without either side"),
        }
    }
}
