//! Protected Route Table
//!
//! Immutable mapping from path prefix to the access level it requires.
//! Built once at startup and shared by reference.

/// Access level a protected prefix requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Any signed-in user
    User,
}

/// Prefix table covering both page routes and API routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoutes {
    entries: Vec<(String, AccessLevel)>,
}

impl Default for ProtectedRoutes {
    fn default() -> Self {
        Self::new([
            ("/notes", AccessLevel::User),
            ("/api/summarize", AccessLevel::User),
        ])
    }
}

impl ProtectedRoutes {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, AccessLevel)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(prefix, level)| (prefix.into(), level))
                .collect(),
        }
    }

    /// Whether `path` falls under any protected prefix.
    ///
    /// Plain prefix match: `/notes` covers `/notes/123` (and `/notes-archive`).
    pub fn is_protected(&self, path: &str) -> bool {
        self.required_access(path).is_some()
    }

    /// Level required for `path`, first matching entry wins.
    pub fn required_access(&self, path: &str) -> Option<AccessLevel> {
        self.entries
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, level)| *level)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(prefix, _)| prefix.as_str())
    }
}
