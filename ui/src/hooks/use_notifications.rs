use std::time::Duration;

use dioxus::prelude::*;

use crate::console_debug;
use crate::notifications::{NewNotification, Notification, NotificationQueue};
use crate::utils::platform::{now_ms, sleep};

/// Polling period of the auto-hide loop
const EXPIRY_TICK_MS: u64 = 500;

#[derive(Clone, Copy, PartialEq)]
pub struct UseNotifications {
    pub queue: Signal<NotificationQueue>,
}

impl UseNotifications {
    pub fn push(&self, notification: NewNotification) -> u64 {
        let mut queue = self.queue;
        let id = queue.write().push(notification, now_ms());
        id
    }

    pub fn dismiss(&self, id: u64) {
        let mut queue = self.queue;
        queue.write().dismiss(id, now_ms());
    }

    pub fn visible(&self) -> Option<Notification> {
        self.queue.read().visible().cloned()
    }
}

/// Creates the queue for the tree and runs the auto-hide loop
pub fn use_notifications_provider() -> UseNotifications {
    let notifications = use_context_provider(|| UseNotifications {
        queue: Signal::new(NotificationQueue::new()),
    });

    use_future(move || async move {
        let mut queue = notifications.queue;
        loop {
            sleep(Duration::from_millis(EXPIRY_TICK_MS)).await;
            let due = queue
                .peek()
                .next_expiry()
                .map(|at| at <= now_ms())
                .unwrap_or(false);
            if due {
                let expired = queue.write().expire(now_ms());
                console_debug!("[Notifications] Auto-hid {:?}", expired);
            }
        }
    });

    notifications
}

pub fn use_notifications() -> UseNotifications {
    use_context::<UseNotifications>()
}
