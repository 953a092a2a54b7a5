#[derive(Debug, Clone, PartialEq)]
pub struct HandicapSettings {
    pub base: f64,
    pub percentage: f64,
}

impl Default for HandicapSettings {
    fn default() -> Self {
        Self {
            base: 220.0,
            percentage: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "bowling_league.db".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub handicap: HandicapSettings,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            handicap: HandicapSettings::default(),
            database: DatabaseSettings::default(),
            server: ServerSettings::default(),
        }
    }

    pub fn with_database_path(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.database.path = path;
        }
        self
    }
}
