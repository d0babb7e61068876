use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct LoadingIndicatorProps {
    pub message: String,
    #[props(default = false)]
    pub inline: bool,
}

#[component]
pub fn LoadingIndicator(props: LoadingIndicatorProps) -> Element {
    rsx! {
        div {
            class: if props.inline { "loading-indicator inline" } else { "loading-indicator" },
            span { class: "spinner" }
            "{props.message}"
        }
    }
}
