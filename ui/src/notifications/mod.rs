//! User-facing notifications shown by the toast

pub mod queue;

pub use queue::{NewNotification, Notification, NotificationAction, NotificationKind, NotificationQueue, Notifier};
