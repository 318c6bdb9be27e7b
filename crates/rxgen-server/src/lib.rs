pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod services;
pub mod state;

pub use config::{AppConfig, Cli};
pub use server::{app_config, run_server};
pub use state::AppState;
