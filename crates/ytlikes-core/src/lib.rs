//! Shared model and configuration for the `ytlikes` workspace.

pub mod app_config;
pub mod config;
pub mod error;
pub mod model;

pub use app_config::{AppConfig, Credentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use model::{CommentRecord, FetchStatus, RunSummary};
