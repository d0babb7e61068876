use dioxus::prelude::*;

use crate::components::buttons::{ButtonVariant, LinkButton};

#[component]
pub fn HeroSection(start_href: String) -> Element {
    rsx! {
        section {
            class: "landing-hero",
            h1 { class: "hero-title", "One Ledger app for the whole Polkadot ecosystem" }
            p {
                class: "hero-subtitle",
                "Move funds from legacy chain-specific Ledger apps to the Polkadot Universal app in a few guided steps."
            }
            div {
                class: "hero-actions",
                LinkButton { href: start_href, "Start migration" }
                LinkButton {
                    href: "https://support.ledger.com".to_string(),
                    variant: ButtonVariant::Ghost,
                    "Learn more"
                }
            }
        }
    }
}
