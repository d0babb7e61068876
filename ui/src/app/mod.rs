//! Top-level pages

pub mod landing;
pub mod migration_assistant;

pub use landing::Landing;
pub use migration_assistant::MigrationAssistant;
