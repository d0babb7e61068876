use dioxus::prelude::*;

use crate::hooks::use_notifications;
use crate::notifications::NotificationKind;

fn kind_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "toast toast-info",
        NotificationKind::Success => "toast toast-success",
        NotificationKind::Warning => "toast toast-warning",
        NotificationKind::Error => "toast toast-error",
    }
}

fn kind_emote(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "ℹ️",
        NotificationKind::Success => "✅",
        NotificationKind::Warning => "⚠️",
        NotificationKind::Error => "❌",
    }
}

/// Snackbar showing the newest active notification
#[component]
pub fn Toast() -> Element {
    let notifications = use_notifications();
    let Some(notification) = notifications.visible() else {
        return rsx! {};
    };

    let id = notification.id;
    let waiting = notifications.queue.read().active().len().saturating_sub(1);

    rsx! {
        div {
            class: kind_class(notification.kind),
            role: "status",
            span { class: "toast-emote", {kind_emote(notification.kind)} }
            div {
                class: "toast-body",
                div { class: "toast-title", "{notification.title}" }
                if !notification.description.is_empty() {
                    div { class: "toast-description", "{notification.description}" }
                }
                if let Some(action) = &notification.action {
                    a {
                        class: "toast-action",
                        href: "{action.url}",
                        target: "_blank",
                        "{action.label}"
                    }
                }
            }
            if waiting > 0 {
                span { class: "toast-queued", "+{waiting}" }
            }
            button {
                class: "toast-dismiss",
                aria_label: "Dismiss",
                onclick: move |_| notifications.dismiss(id),
                "×"
            }
        }
    }
}
