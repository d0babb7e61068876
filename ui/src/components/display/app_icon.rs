use dioxus::prelude::*;

use crate::services::icons::IconStore;

/// The app's SVG when the icon store has it, otherwise its ticker
#[component]
pub fn AppIcon(app_id: String, ticker: String, icons: Signal<IconStore>) -> Element {
    let markup = icons.read().get(&app_id).map(str::to_string);

    match markup {
        Some(svg) => rsx! {
            span { class: "app-icon", dangerous_inner_html: svg }
        },
        None => rsx! {
            span { class: "app-icon app-icon-fallback", "{ticker}" }
        },
    }
}
