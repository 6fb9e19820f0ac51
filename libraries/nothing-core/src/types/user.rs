/// User profile domain type
use serde::{Deserialize, Serialize};

/// Profile of the authenticated caller
///
/// Owned by the remote service. Absent until the first sign-in completes the
/// profile setup prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,
}

impl UserProfile {
    /// Create a profile with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
