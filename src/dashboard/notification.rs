//! Transient notifications
//!
//! Every finished operation ends in at most one notification. Notifications expire
//! on their own after the configured time-to-live.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Font Awesome icon used by the admin page
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "fa-check-circle",
            NotificationKind::Error => "fa-exclamation-circle",
            NotificationKind::Info => "fa-info-circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Notifications currently on screen
#[derive(Debug)]
pub struct NotificationCenter {
    ttl: chrono::Duration,
    next_id: u64,
    active: VecDeque<Notification>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX / 1_000_000);
        Self {
            ttl: chrono::Duration::milliseconds(ttl_ms),
            next_id: 1,
            active: VecDeque::new(),
        }
    }

    /// Show a new notification created at `now`
    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>, now: DateTime<Utc>) -> Notification {
        self.prune(now);

        let notification = Notification {
            id: self.next_id,
            kind,
            message: message.into(),
            created_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.next_id += 1;
        self.active.push_back(notification.clone());
        notification
    }

    /// Drop expired notifications and return the ones still visible, oldest first
    pub fn active(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        self.prune(now);
        self.active.iter().cloned().collect()
    }

    /// Remove a notification before it expires
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        self.active.retain(|n| !n.is_expired(now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn test_notifications_expire_after_ttl() {
        let mut center = NotificationCenter::new(Duration::from_millis(4000));
        center.push(NotificationKind::Success, "Saved", at(0));
        center.push(NotificationKind::Error, "Broken", at(1000));

        assert_eq!(center.active(at(3999)).len(), 2);

        let remaining = center.active(at(4000));
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "Broken");

        assert!(center.active(at(5000)).is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_dismissable() {
        let mut center = NotificationCenter::new(Duration::from_secs(10));
        let a = center.push(NotificationKind::Info, "a", at(0));
        let b = center.push(NotificationKind::Info, "b", at(0));
        assert_ne!(a.id, b.id);

        assert!(center.dismiss(a.id));
        assert!(!center.dismiss(a.id));
        assert_eq!(center.active(at(1)), vec![b]);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let mut center = NotificationCenter::new(Duration::from_millis(i64::MAX as u64));
        let n = center.push(NotificationKind::Info, "Stays", Utc::now());

        assert_eq!(n.expires_at, DateTime::<Utc>::MAX_UTC);
        assert_eq!(center.active(at(0)).len(), 1);

        let mut center = NotificationCenter::new(Duration::from_millis(u64::MAX));
        center.push(NotificationKind::Error, "Also stays", at(0));
        assert_eq!(center.active(at(1)).len(), 1);
    }

    #[test]
    fn test_icons() {
        assert_eq!(NotificationKind::Success.icon(), "fa-check-circle");
        assert_eq!(NotificationKind::Error.icon(), "fa-exclamation-circle");
        assert_eq!(NotificationKind::Info.icon(), "fa-info-circle");
    }
}
