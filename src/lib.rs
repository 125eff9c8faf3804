pub mod app;
pub mod callbacks;
pub mod commands;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod telegram;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use gateway::{BotApi, Gateway};
pub use state::AppState;
pub use storage::Storage;
