use async_trait::async_trait;
use rspotify::{
    model::{SearchResult, SearchType},
    prelude::*,
    ClientCredsSpotify,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::engine::{ProviderError, Track, TrackSearchProvider};

const SEARCH_LIMIT: u32 = 5;

pub struct Search {
    spotify: Arc<Mutex<ClientCredsSpotify>>,
}

impl Search {
    pub fn new(spotify: Arc<Mutex<ClientCredsSpotify>>) -> Self {
        Search { spotify }
    }
}

#[async_trait]
impl TrackSearchProvider for Search {
    async fn search(&self, query: &str) -> Result<Vec<Track>, ProviderError> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }
        let sp = self.spotify.lock().await;
        let result = sp
            .search(
                query,
                SearchType::Track,
                None,
                None,
                Some(SEARCH_LIMIT),
                None,
            )
            .await?;

        let tracks = match result {
            SearchResult::Tracks(page) => page.items.iter().map(super::track_from_full).collect(),
            _ => vec![],
        };
        Ok(tracks)
    }
}
