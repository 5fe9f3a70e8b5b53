use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TOKEN_DIR: &str = ".session";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    /// Directory dello storage durevole del token
    pub token_dir: PathBuf,
}

impl ClientConfig {
    pub fn new(api_base_url: &str, token_dir: impl Into<PathBuf>) -> Result<Self, String> {
        let api_base_url = Url::parse(api_base_url)
            .map_err(|e| format!("Invalid API_BASE_URL `{}`: {}", api_base_url, e))?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(format!(
                "Invalid API_BASE_URL `{}`: scheme must be http or https",
                api_base_url
            ));
        }
        Ok(Self {
            api_base_url,
            token_dir: token_dir.into(),
        })
    }

    /// Carica la configurazione dalle variabili d'ambiente
    /// Chiama dotenv() automaticamente
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let token_dir = env::var("TOKEN_DIR").unwrap_or_else(|_| DEFAULT_TOKEN_DIR.to_string());

        Self::new(&api_base_url, token_dir)
    }
}
