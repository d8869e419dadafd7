//! Recommendation core: candidate-pool selection and hybrid mood ranking.
//!
//! Network-bound collaborators sit behind the traits below, so ranking is a
//! pure in-memory computation over data the collaborators already fetched.

pub mod mood;
pub mod score;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use self::score::KeywordScorer;

/// How many tracks a recommendation returns at most.
const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub preview_url: Option<String>,
    pub spotify_url: Option<String>,
}

/// Audio descriptors for a track. Dimensions the lookup could not fill are
/// `None` and score against the neutral 0.5.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioFeatures {
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub danceability: Option<f64>,
}

impl AudioFeatures {
    /// An all-empty feature set carries no signal and is treated exactly
    /// like an absent lookup result.
    pub fn is_empty(&self) -> bool {
        self.energy.is_none() && self.valence.is_none() && self.danceability.is_none()
    }
}

/// Transport-level collaborator failures. "Nothing found" is not an error;
/// collaborators report it as `Ok(None)` or an empty list.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("spotify request failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait AudioFeatureProvider: Send + Sync {
    async fn features(
        &self,
        track: &str,
        artist: &str,
    ) -> Result<Option<AudioFeatures>, ProviderError>;
}

#[async_trait]
pub trait TrackSearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Track>, ProviderError>;
}

#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    async fn tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ProviderError>;
}

/// Which candidate pool a recommendation was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CandidateSource {
    Playlist,
    Search,
    Fallback,
}

/// How many candidates each scoring method handled. Diagnostic only; never
/// part of the ranked track list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankStats {
    pub feature_scored: usize,
    pub keyword_scored: usize,
}

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub tracks: Vec<Track>,
    pub source: CandidateSource,
    pub stats: RankStats,
}

pub struct Recommender {
    features: Arc<dyn AudioFeatureProvider>,
    search: Arc<dyn TrackSearchProvider>,
    playlists: Arc<dyn PlaylistProvider>,
    keyword_scorer: KeywordScorer,
}

impl Recommender {
    pub fn new(
        features: Arc<dyn AudioFeatureProvider>,
        search: Arc<dyn TrackSearchProvider>,
        playlists: Arc<dyn PlaylistProvider>,
        keyword_scorer: KeywordScorer,
    ) -> Self {
        Recommender {
            features,
            search,
            playlists,
            keyword_scorer,
        }
    }

    /// Ranks the tracks of the given playlist against the analysis text, or
    /// falls through to a generic mood search when there is no usable
    /// playlist. Collaborator failures never escape: the worst case is the
    /// static fallback list.
    pub async fn recommend(&self, analysis: &str, playlist_url: Option<&str>) -> Recommendation {
        if let Some(url) = playlist_url.filter(|u| !u.trim().is_empty()) {
            match extract_playlist_id(url) {
                Some(id) => match self.playlists.tracks(&id).await {
                    Ok(tracks) if !tracks.is_empty() => {
                        info!(playlist = %id, candidates = tracks.len(), "ranking playlist tracks");
                        return self.rank(tracks, analysis).await;
                    }
                    Ok(_) => info!(playlist = %id, "playlist is empty, using generic search"),
                    Err(e) => {
                        warn!(playlist = %id, error = %e, "playlist retrieval failed, using generic search")
                    }
                },
                None => info!(url, "no playlist id in url, using generic search"),
            }
        }
        self.search_generic(analysis).await
    }

    // Generic search results arrive in collaborator relevance order and are
    // already capped, so they bypass the hybrid ranker.
    async fn search_generic(&self, analysis: &str) -> Recommendation {
        let query = mood::search_query(analysis);
        match self.search.search(query).await {
            Ok(tracks) => {
                info!(query, results = tracks.len(), "generic search complete");
                Recommendation {
                    tracks,
                    source: CandidateSource::Search,
                    stats: RankStats::default(),
                }
            }
            Err(e) => {
                warn!(query, error = %e, "search failed, serving fallback tracks");
                Recommendation {
                    tracks: fallback_tracks(),
                    source: CandidateSource::Fallback,
                    stats: RankStats::default(),
                }
            }
        }
    }

    /// Hybrid ranking: feature distance when audio features exist for a
    /// candidate, keyword heuristics otherwise. The sort is stable, so
    /// equal scores keep their candidate-pool order.
    async fn rank(&self, candidates: Vec<Track>, analysis: &str) -> Recommendation {
        let target = mood::extract(analysis);
        let analysis = analysis.to_lowercase();
        let mut stats = RankStats::default();
        let mut scored: Vec<(Track, f64)> = Vec::with_capacity(candidates.len());

        for track in candidates {
            let features = match self.features.features(&track.name, &track.artist).await {
                Ok(features) => features,
                Err(e) => {
                    warn!(track = %track.name, error = %e, "feature lookup failed");
                    None
                }
            };

            let score = match features.filter(|f| !f.is_empty()) {
                Some(features) => {
                    stats.feature_scored += 1;
                    let score = score::feature_match(&target, &features);
                    debug!(track = %track.name, score, "scored from audio features");
                    score
                }
                None => {
                    stats.keyword_scored += 1;
                    let score = self.keyword_scorer.score(&track, &analysis);
                    debug!(track = %track.name, score, "scored from keywords");
                    score
                }
            };
            scored.push((track, score));
        }

        info!(
            feature_scored = stats.feature_scored,
            keyword_scored = stats.keyword_scored,
            "hybrid ranking complete"
        );

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(MAX_RESULTS);

        Recommendation {
            tracks: scored.into_iter().map(|(track, _)| track).collect(),
            source: CandidateSource::Playlist,
            stats,
        }
    }
}

/// Pulls a playlist id out of either an `open.spotify.com/playlist/<id>`
/// link or a `spotify:playlist:<id>` URI. Anything else is "no playlist".
pub fn extract_playlist_id(url: &str) -> Option<String> {
    let url = url.trim();
    if let Some((_, rest)) = url.split_once("playlist/") {
        let id = rest.split('?').next().unwrap_or("");
        if !id.is_empty() {
            return Some(id.to_string());
        }
    } else if let Some((_, rest)) = url.split_once("playlist:") {
        if !rest.is_empty() {
            return Some(rest.to_string());
        }
    }
    None
}

// Served when every collaborator path has failed; a request always gets a
// track list back, never an error payload.
pub(crate) fn fallback_tracks() -> Vec<Track> {
    vec![
        Track {
            name: "Chill Vibes".to_string(),
            artist: "Mock Artist".to_string(),
            preview_url: None,
            spotify_url: None,
        },
        Track {
            name: "Peaceful Mind".to_string(),
            artist: "Relaxation Songs".to_string(),
            preview_url: None,
            spotify_url: None,
        },
    ]
}
