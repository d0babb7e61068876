pub mod connect_step;
pub mod migrate_step;
pub mod synchronize_step;

pub use connect_step::*;
pub use migrate_step::*;
pub use synchronize_step::*;
