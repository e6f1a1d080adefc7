use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string; `None` runs on the in-memory stores.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fitpals".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fitpals-members".into()),
        };
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        Ok(Self {
            database_url,
            jwt,
            host,
            port,
        })
    }

    /// Config for tests and local tinkering: in-memory stores, fixed secret.
    pub fn local(secret: &str) -> Self {
        Self {
            database_url: None,
            jwt: JwtConfig {
                secret: secret.into(),
                issuer: "fitpals".into(),
                audience: "fitpals-members".into(),
            },
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}
