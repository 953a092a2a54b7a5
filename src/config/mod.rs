pub mod settings;

pub use settings::{AppConfig, DatabaseSettings, HandicapSettings, ServerSettings};
