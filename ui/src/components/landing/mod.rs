pub mod hero;
pub mod sections;

pub use hero::HeroSection;
pub use sections::{AudienceSection, CallToActionSection, FeatureSection, ProblemSection, SolutionSection};
