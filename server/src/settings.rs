use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite:daybook.db".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Activity {
    pub url: String,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            url: "https://bored-api.appbrewery.com/random".into(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub activity: Activity,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite:daybook.db")?
            .set_default("activity.url", "https://bored-api.appbrewery.com/random")?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings() {
        std::env::set_var("ACTIVITY_URL", "http://localhost:9999/random");
        let settings = Settings::new().unwrap_or_default();
        assert_eq!(settings.activity.url, "http://localhost:9999/random");
        assert_eq!(settings.server.addr(), "127.0.0.1:8000");
    }
}
