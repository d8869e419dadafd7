mod brainz;
mod cache;
mod config;
mod engine;
mod server;
mod spotify;
mod vision;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    brainz::AcousticBrainz,
    cache::Cache,
    config::Config,
    engine::{score::KeywordScorer, Recommender},
    server::AppContext,
    spotify::{build_spotify_client, playlist::Playlists, search::Search},
    vision::ImageAnalyzer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("moodpick=info"));
    fmt().with_env_filter(filter).init();

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load()?;

    // ── Redis (optional — only the Spotify token cache suffers without it) ───
    let cache = Cache::new(&config.redis_url)?;
    if cache.ping().await {
        info!("Redis connected at {}", config.redis_url);
    } else {
        warn!("Redis not reachable — token caching disabled");
    }

    // ── Spotify app-token client ─────────────────────────────────────────────
    let spotify = build_spotify_client(&config, &cache).await?;

    // ── Wire collaborators into the engine ───────────────────────────────────
    let recommender = Recommender::new(
        Arc::new(AcousticBrainz::new()),
        Arc::new(Search::new(spotify.clone())),
        Arc::new(Playlists::new(spotify)),
        KeywordScorer::new(config.keyword_jitter),
    );
    let analyzer = ImageAnalyzer::new(config.openai_api_key.clone());
    let ctx = Arc::new(AppContext {
        recommender,
        analyzer,
    });

    // ── Serve ────────────────────────────────────────────────────────────────
    server::run(&config.bind_addr, ctx).await
}
