use dioxus::prelude::*;
use ui::{Landing, MigrationAssistant};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        Router::<Route> {}
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/migrate")]
    Migrate {},
}

#[component]
fn Home() -> Element {
    rsx! {
        Landing {}
    }
}

#[component]
fn Migrate() -> Element {
    rsx! {
        MigrationAssistant {}
    }
}
