use config::{Config, Environment, File};
use once_cell::sync::Lazy;
use serde::Deserialize;

pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::load().unwrap_or_else(|e| panic!("Failed to load configuration: {e}"))
});

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub question_model: String,
    pub evaluation_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub ttl_minutes: i64,
    pub question_count: usize,
}

impl AppConfig {
    fn load() -> Result<Self, config::ConfigError> {
        Config::builder()
            .set_default("server.address", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("generator.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("generator.question_model", "gemini-3-flash-preview")?
            .set_default("generator.evaluation_model", "gemini-2.5-flash")?
            .set_default("generator.timeout_secs", 30)?
            .set_default("session.ttl_minutes", 30)?
            .set_default("session.question_count", 5)?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("AGRILEARN")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
