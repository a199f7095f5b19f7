pub mod analysis;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod progress;
pub mod records;
pub mod state;
pub mod store;
pub mod ui;
pub mod validation;

pub use app::router;
pub use config::Config;
pub use state::AppState;
