//! Human-readable sync state.

use std::fmt;

/// The last sync outcome, shown to the user as a short string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing has happened yet
    #[default]
    Idle,
    Synced,
    PullFailed,
    PushFailed,
    SignInFailed,
    /// No remote document identifier is configured
    NotConfigured,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Idle => "",
            SyncStatus::Synced => "Synced",
            SyncStatus::PullFailed => "Pull failed",
            SyncStatus::PushFailed => "Push failed",
            SyncStatus::SignInFailed => "Sign-in failed",
            SyncStatus::NotConfigured => "Sync not configured",
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            SyncStatus::PullFailed
                | SyncStatus::PushFailed
                | SyncStatus::SignInFailed
                | SyncStatus::NotConfigured
        )
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
