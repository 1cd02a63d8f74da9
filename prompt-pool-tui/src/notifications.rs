//! Notification system for the TUI.

use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient message for the status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self::at(level, message, Utc::now())
    }

    pub fn at(level: NotificationLevel, message: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        now.signed_duration_since(self.created_at)
            .to_std()
            .map(|age| age >= lifetime)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_after_lifetime() {
        let created = Utc::now();
        let note = Notification::at(NotificationLevel::Info, "Deleted", created);
        let lifetime = Duration::from_secs(3);
        assert!(!note.is_expired(created, lifetime));
        assert!(!note.is_expired(created + chrono::Duration::seconds(2), lifetime));
        assert!(note.is_expired(created + chrono::Duration::seconds(3), lifetime));
    }

    #[test]
    fn test_clock_skew_never_expires_early() {
        let created = Utc::now();
        let note = Notification::at(NotificationLevel::Error, "failed", created);
        assert!(!note.is_expired(created - chrono::Duration::seconds(10), Duration::from_secs(1)));
    }
}
