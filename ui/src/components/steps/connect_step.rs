use dioxus::prelude::*;

use crate::components::buttons::{Button, ButtonVariant};
use crate::hooks::{use_connection, use_ledger_store, TabController, TabGate, WizardTab};
use crate::console_info;
use crate::utils::platform::supports_webhid;

#[derive(Props, PartialEq, Clone)]
pub struct ConnectStepProps {
    pub tabs: Signal<TabController>,
}

#[component]
pub fn ConnectStep(props: ConnectStepProps) -> Element {
    let mut tabs = props.tabs;
    let ledger_state = use_ledger_store().state;
    let connection = use_connection();
    let app_name = connection.app_name.clone().unwrap_or_default();
    let mut connecting = use_signal(|| false);

    let on_connect = {
        let connection = connection.clone();
        move |_: MouseEvent| {
            let connection = connection.clone();
            connecting.set(true);
            spawn(async move {
                if connection.connect_device().await {
                    console_info!("[Connect] Device ready, accounts synchronized");
                    let gate = TabGate::from_state(&ledger_state.peek());
                    tabs.write().go_to(WizardTab::Synchronize, gate);
                }
                connecting.set(false);
            });
        }
    };

    let on_disconnect = {
        let connection = connection.clone();
        move |_: MouseEvent| {
            let connection = connection.clone();
            spawn(async move {
                connection.disconnect_device().await;
            });
        }
    };

    rsx! {
        div {
            class: "wizard-step connect-step",

            h2 { class: "step-title", "Connect your Ledger" }

            if !supports_webhid() {
                div {
                    class: "step-warning",
                    "⚠️ This browser has no WebHID support. Use Chrome, Edge or Brave on a desktop computer."
                }
            }

            ol {
                class: "step-instructions",
                li { "Plug in your Ledger and unlock it with your PIN" }
                li { "Open the Polkadot app on the device" }
                li { "Click connect and pick the device in the browser prompt" }
            }

            if connection.is_ledger_connected {
                div {
                    class: "connection-status",
                    if connection.is_app_open {
                        "✅ Connected to {app_name}"
                    } else {
                        "⚠️ Connected, but the Polkadot app is not open"
                    }
                }
            }

            div {
                class: "button-section",
                Button {
                    loading: connecting(),
                    onclick: on_connect,
                    if connection.is_ledger_connected { "Reconnect" } else { "Connect Ledger" }
                }
                if connection.is_ledger_connected {
                    Button {
                        variant: ButtonVariant::Outline,
                        disabled: connecting(),
                        onclick: on_disconnect,
                        "Disconnect"
                    }
                }
            }
        }
    }
}
