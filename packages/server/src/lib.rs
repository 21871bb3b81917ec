//! Memo server: settings, HTTP routes and startup.

mod application;
pub mod routes;
pub mod settings;

pub use application::launch;
pub use routes::{router, AppState};
pub use settings::Settings;
