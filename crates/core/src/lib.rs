pub mod config;

pub use config::{load_dotenv, Config, ImportConfig, RemoteConfig, DEFAULT_ALERT_CATEGORIES};
