use anyhow::Result;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub openai_api_key: Option<String>,
    pub redis_url: String,
    pub bind_addr: String,
    /// Amplitude of the keyword scorer's tie-break term; 0 disables it.
    pub keyword_jitter: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok(); // Try loading .env file, ignore if it doesn't exist (e.g. env vars set manually)

        Ok(Config {
            spotify_client_id: std::env::var("SPOTIFY_CLIENT_ID")
                .expect("SPOTIFY_CLIENT_ID is missing from .env or environment!"),
            spotify_client_secret: std::env::var("SPOTIFY_CLIENT_SECRET")
                .expect("SPOTIFY_CLIENT_SECRET is missing from .env or environment!"),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            keyword_jitter: std::env::var("KEYWORD_JITTER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.5),
        })
    }
}
