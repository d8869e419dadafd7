use async_trait::async_trait;
use futures::TryStreamExt;
use rspotify::{
    model::{PlayableItem, PlaylistId, PlaylistItem},
    prelude::*,
    ClientCredsSpotify,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::engine::{PlaylistProvider, ProviderError, Track};

pub struct Playlists {
    spotify: Arc<Mutex<ClientCredsSpotify>>,
}

impl Playlists {
    pub fn new(spotify: Arc<Mutex<ClientCredsSpotify>>) -> Self {
        Playlists { spotify }
    }
}

#[async_trait]
impl PlaylistProvider for Playlists {
    /// Follows the paginated items stream to exhaustion. Episodes and
    /// removed tracks are skipped.
    async fn tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ProviderError> {
        let sp = self.spotify.lock().await;
        let pid = PlaylistId::from_id(playlist_id)
            .map_err(|e| ProviderError::Malformed(format!("playlist id: {e}")))?;
        let stream = sp.playlist_items(pid, None, None);
        let items: Vec<PlaylistItem> = stream.try_collect().await?;

        let tracks: Vec<Track> = items
            .into_iter()
            .filter_map(|item| match item.track {
                Some(PlayableItem::Track(track)) => Some(super::track_from_full(&track)),
                _ => None,
            })
            .collect();

        info!(playlist = playlist_id, tracks = tracks.len(), "retrieved playlist tracks");
        Ok(tracks)
    }
}
