pub mod account_list;
pub mod app_icon;
pub mod loading_indicator;
pub mod migration_progress;
pub mod tx_status_badge;

pub use account_list::*;
pub use app_icon::*;
pub use loading_indicator::*;
pub use migration_progress::*;
pub use tx_status_badge::*;
