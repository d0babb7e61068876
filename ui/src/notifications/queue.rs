use std::cell::RefCell;

use crate::utils::platform::now_ms;

/// Dismissed notifications kept around for the history view
const MAX_DISMISSED: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NotificationAction {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    pub created_at: f64,
    pub dismissed_at: Option<f64>,
    pub action: Option<NotificationAction>,
    pub auto_hide_ms: Option<u64>,
}

impl Notification {
    pub fn expires_at(&self) -> Option<f64> {
        self.auto_hide_ms.map(|ms| self.created_at + ms as f64)
    }
}

/// A notification before it gets an id and timestamp
#[derive(Clone, Debug, PartialEq)]
pub struct NewNotification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
    pub action: Option<NotificationAction>,
    pub auto_hide_ms: Option<u64>,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
            action: None,
            auto_hide_ms: None,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, description)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, description)
    }

    pub fn with_action(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.action = Some(NotificationAction {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    pub fn auto_hide(mut self, ms: u64) -> Self {
        self.auto_hide_ms = Some(ms);
        self
    }
}

/// Active notifications in arrival order. The newest active one is the
/// one on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationQueue {
    next_id: u64,
    active: Vec<Notification>,
    dismissed: Vec<Notification>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            active: Vec::new(),
            dismissed: Vec::new(),
        }
    }

    pub fn push(&mut self, notification: NewNotification, now: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(Notification {
            id,
            title: notification.title,
            description: notification.description,
            kind: notification.kind,
            created_at: now,
            dismissed_at: None,
            action: notification.action,
            auto_hide_ms: notification.auto_hide_ms,
        });
        id
    }

    /// Removes `id` from the active list; false when it was not active
    pub fn dismiss(&mut self, id: u64, now: f64) -> bool {
        let Some(index) = self.active.iter().position(|n| n.id == id) else {
            return false;
        };

        let mut notification = self.active.remove(index);
        notification.dismissed_at = Some(now);
        self.dismissed.push(notification);
        if self.dismissed.len() > MAX_DISMISSED {
            self.dismissed.remove(0);
        }
        true
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }

    pub fn dismissed(&self) -> &[Notification] {
        &self.dismissed
    }

    /// The notification the toast shows
    pub fn visible(&self) -> Option<&Notification> {
        self.active.last()
    }

    /// Dismisses every auto-hiding notification whose time is up
    pub fn expire(&mut self, now: f64) -> Vec<u64> {
        let expired: Vec<u64> = self
            .active
            .iter()
            .filter(|n| n.expires_at().map(|at| at <= now).unwrap_or(false))
            .map(|n| n.id)
            .collect();

        for id in &expired {
            self.dismiss(*id, now);
        }
        expired
    }

    /// Earliest pending auto-hide deadline
    pub fn next_expiry(&self) -> Option<f64> {
        self.active
            .iter()
            .filter_map(Notification::expires_at)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn clear(&mut self) {
        let now = now_ms();
        let ids: Vec<u64> = self.active.iter().map(|n| n.id).collect();
        for id in ids {
            self.dismiss(id, now);
        }
    }
}

/// Where the store sends user-facing messages
pub trait Notifier {
    fn notify(&self, notification: NewNotification);
}

impl Notifier for RefCell<NotificationQueue> {
    fn notify(&self, notification: NewNotification) {
        self.borrow_mut().push(notification, now_ms());
    }
}
