use anyhow::Result;
use chrono::Utc;
use rspotify::{model::FullTrack, ClientCredsSpotify, Config as SpotifyConfig, Credentials};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::cache::Cache;
use crate::config::Config;
use crate::engine::Track;

pub mod playlist;
pub mod search;

const TOKEN_CACHE_KEY: &str = "moodpick:spotify_token";

/// Builds the shared client-credentials client. The app token lives behind
/// the client's internal async mutex and refreshes itself on expiry; Redis
/// keeps a copy so a restart skips one token round-trip.
pub async fn build_spotify_client(
    config: &Config,
    cache: &Cache,
) -> Result<Arc<Mutex<ClientCredsSpotify>>> {
    let creds = Credentials::new(&config.spotify_client_id, &config.spotify_client_secret);

    let sp_config = SpotifyConfig {
        token_refreshing: true,
        ..Default::default()
    };

    let spotify = ClientCredsSpotify::with_config(creds, sp_config);

    // Try loading a still-valid token from Redis
    if let Ok(Some(token_json)) = cache.get(TOKEN_CACHE_KEY).await {
        if let Ok(token) = serde_json::from_str::<rspotify::Token>(&token_json) {
            if !token.is_expired() {
                info!("Loaded cached Spotify token from Redis");
                *spotify.token.lock().await.unwrap() = Some(token);
                return Ok(Arc::new(Mutex::new(spotify)));
            }
        }
    }

    spotify.request_token().await?;
    info!("Requested fresh Spotify app token");

    // Cache the token for its remaining lifetime
    let cached = {
        let token_guard = spotify.token.lock().await.unwrap();
        if let Some(ref token) = *token_guard {
            let ttl = token
                .expires_at
                .map(|at| (at - Utc::now()).num_seconds().max(0) as u64);
            let token_json = serde_json::to_string(token)?;
            Some((token_json, ttl))
        } else {
            None
        }
    };
    if let Some((token_json, ttl)) = cached {
        cache.set(TOKEN_CACHE_KEY, &token_json, ttl).await.ok();
        info!("Spotify token saved to Redis cache");
    }

    Ok(Arc::new(Mutex::new(spotify)))
}

// Collaborators surface only what the engine ranks on: name, first listed
// artist, preview URL and external Spotify URL.
pub(crate) fn track_from_full(track: &FullTrack) -> Track {
    Track {
        name: track.name.clone(),
        artist: track
            .artists
            .first()
            .map(|artist| artist.name.clone())
            .unwrap_or_default(),
        preview_url: track.preview_url.clone(),
        spotify_url: track.external_urls.get("spotify").cloned(),
    }
}
