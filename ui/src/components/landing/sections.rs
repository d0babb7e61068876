use dioxus::prelude::*;

use crate::components::buttons::LinkButton;

struct Card {
    emote: &'static str,
    title: &'static str,
    text: &'static str,
}

const FEATURES: [Card; 3] = [
    Card {
        emote: "🔌",
        title: "Connect once",
        text: "Plug in your Ledger, open the Polkadot app and the assistant finds your accounts.",
    },
    Card {
        emote: "🔍",
        title: "See every balance",
        text: "Accounts of each legacy app are derived on the device and their balances fetched for you.",
    },
    Card {
        emote: "✍️",
        title: "Approve on device",
        text: "Every transfer is shown on your Ledger screen before it is signed.",
    },
];

const AUDIENCE: [Card; 3] = [
    Card {
        emote: "🧑‍💻",
        title: "Long-time holders",
        text: "Funds sitting in Kusama, Acala or other parachain apps since their launch.",
    },
    Card {
        emote: "🏦",
        title: "Stakers and collators",
        text: "Accounts that need the features only the Universal app receives.",
    },
    Card {
        emote: "🌱",
        title: "New users",
        text: "Anyone who wants one app for every chain from now on.",
    },
];

fn render_cards(cards: &[Card]) -> Element {
    rsx! {
        div {
            class: "card-grid",
            for card in cards.iter() {
                div {
                    key: "{card.title}",
                    class: "landing-card",
                    span { class: "card-emote", "{card.emote}" }
                    h3 { class: "card-title", "{card.title}" }
                    p { class: "card-text", "{card.text}" }
                }
            }
        }
    }
}

#[component]
pub fn FeatureSection() -> Element {
    rsx! {
        section {
            class: "landing-section features",
            h2 { class: "section-title", "How it works" }
            {render_cards(&FEATURES)}
        }
    }
}

#[component]
pub fn ProblemSection() -> Element {
    rsx! {
        section {
            class: "landing-section problem",
            h2 { class: "section-title", "One app per chain does not scale" }
            p {
                "Each parachain used to ship its own Ledger app. Those apps fall behind runtime upgrades, "
                "and keeping a dozen of them installed is a chore."
            }
        }
    }
}

#[component]
pub fn SolutionSection() -> Element {
    rsx! {
        section {
            class: "landing-section solution",
            h2 { class: "section-title", "The Universal app" }
            p {
                "The Polkadot app signs for every chain using metadata checked on the device. "
                "This assistant moves your balances to addresses it controls, chain by chain."
            }
        }
    }
}

#[component]
pub fn AudienceSection() -> Element {
    rsx! {
        section {
            class: "landing-section audience",
            h2 { class: "section-title", "Who should migrate" }
            {render_cards(&AUDIENCE)}
        }
    }
}

#[component]
pub fn CallToActionSection(start_href: String) -> Element {
    rsx! {
        section {
            class: "landing-section cta",
            h2 { class: "section-title", "Ready to move?" }
            p { "Keep your Ledger at hand. The whole process takes a few minutes per app." }
            LinkButton { href: start_href, "Open the migration assistant" }
        }
    }
}
