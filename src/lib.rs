pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod gate;
pub mod inventory;
pub mod models;
pub mod pages;
pub mod server;
pub mod session;
pub mod state;
pub mod storage;
pub mod templates;
pub mod theme;
pub use error::{AppError, Result as AppResult};
pub use state::AppState;
