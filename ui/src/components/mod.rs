//! User Interface Components
//!
//! - **buttons**: styled button variants
//! - **display**: app cards, account rows, status badges and the progress dialog
//! - **steps**: the three wizard steps
//! - **landing**: marketing sections of the landing page
//! - **toast**: snackbar for the notification queue

pub mod buttons;
pub mod display;
pub mod landing;
pub mod steps;
pub mod toast;

pub use buttons::{Button, ButtonSize, ButtonVariant, LinkButton};
pub use toast::Toast;
