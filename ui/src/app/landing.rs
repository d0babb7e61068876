use dioxus::prelude::*;

use crate::components::landing::*;

const LANDING_CSS: Asset = asset!("/assets/styling/landing.css");

/// Path of the migration wizard
pub const MIGRATE_HREF: &str = "/migrate";

#[component]
pub fn Landing() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: LANDING_CSS }

        main {
            class: "landing",
            HeroSection { start_href: MIGRATE_HREF.to_string() }
            FeatureSection {}
            ProblemSection {}
            SolutionSection {}
            AudienceSection {}
            CallToActionSection { start_href: MIGRATE_HREF.to_string() }
        }
    }
}
