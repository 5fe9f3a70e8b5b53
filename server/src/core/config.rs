use axum::http::HeaderValue;
use dotenv::dotenv;
use std::env;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "un segreto meno bello";

#[derive(Debug, Clone)]
pub struct Config {
    /// Se assente si usa il repository in memoria
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    /// Origin del frontend autorizzata dal layer CORS (con credenziali)
    pub frontend_url: String,
    pub max_connections: u32,
    pub app_env: String,
}

impl Config {
    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            frontend_url,
            max_connections,
            app_env,
        };
        // validazione anticipata dell'origin, così l'errore emerge all'avvio
        config.frontend_origin()?;
        Ok(config)
    }

    /// Origin del frontend nel formato richiesto dal layer CORS
    pub fn frontend_origin(&self) -> Result<HeaderValue, String> {
        HeaderValue::from_str(self.frontend_url.trim_end_matches('/'))
            .map_err(|_| format!("Invalid FRONTEND_URL: {}", self.frontend_url))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Logga la configurazione (nascondendo i segreti)
    pub fn print_info(&self) {
        info!("Environment: {}", self.app_env);
        info!("Server Address: {}", self.bind_address());
        info!("Frontend Origin: {}", self.frontend_url);
        match &self.database_url {
            Some(url) => {
                info!("Database: {}", Self::mask_url(url));
                info!("Max DB Connections: {}", self.max_connections);
            }
            None => info!("Database: in-memory user repository"),
        }
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT Secret: USING DEFAULT (INSECURE!)");
        } else {
            info!("JWT Secret: custom secret configured");
        }
    }

    /// Maschera l'URL del database per il logging
    fn mask_url(url: &str) -> String {
        if let (Some(at_pos), Some(scheme_end)) = (url.find('@'), url.find("://")) {
            let scheme = &url[..scheme_end + 3];
            let after_at = &url[at_pos..];
            return format!("{}***{}", scheme, after_at);
        }
        "***".to_string()
    }
}
