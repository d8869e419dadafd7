//! Audio-feature lookup: MusicBrainz resolves (track, artist) to a
//! recording id, AcousticBrainz serves the low-level descriptors for it.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::engine::{AudioFeatureProvider, AudioFeatures, ProviderError};

const MUSICBRAINZ_URL: &str = "https://musicbrainz.org/ws/2/recording/";
const ACOUSTICBRAINZ_URL: &str = "https://acousticbrainz.org/api/v1";
// MusicBrainz rejects anonymous clients
const USER_AGENT: &str = concat!("moodpick/", env!("CARGO_PKG_VERSION"));

pub struct AcousticBrainz {
    http: reqwest::Client,
}

impl AcousticBrainz {
    pub fn new() -> Self {
        AcousticBrainz {
            http: reqwest::Client::new(),
        }
    }

    async fn recording_id(
        &self,
        track: &str,
        artist: &str,
    ) -> Result<Option<String>, ProviderError> {
        let query = format!("recording:{track} AND artist:{artist}");
        let url = format!(
            "{MUSICBRAINZ_URL}?query={}&fmt=json&limit=1",
            urlencoding::encode(&query)
        );

        let body: Value = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body["recordings"][0]["id"].as_str().map(str::to_owned))
    }
}

#[async_trait]
impl AudioFeatureProvider for AcousticBrainz {
    async fn features(
        &self,
        track: &str,
        artist: &str,
    ) -> Result<Option<AudioFeatures>, ProviderError> {
        let Some(mbid) = self.recording_id(track, artist).await? else {
            debug!(track, artist, "no MusicBrainz recording found");
            return Ok(None);
        };

        let url = format!("{ACOUSTICBRAINZ_URL}/{mbid}/low-level");
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        // 404 means nobody submitted an analysis for this recording
        if response.status() == StatusCode::NOT_FOUND {
            debug!(track, %mbid, "no AcousticBrainz submission for recording");
            return Ok(None);
        }

        let body: Value = response.error_for_status()?.json().await?;
        Ok(parse_features(&body))
    }
}

/// Maps the low-level descriptors onto the three mood axes: energy from BPM
/// normalized over the 60-180 range, danceability from the 90-130 BPM band,
/// valence from major/minor key scale.
pub(crate) fn parse_features(body: &Value) -> Option<AudioFeatures> {
    let mut features = AudioFeatures::default();

    if let Some(bpm) = body["rhythm"]["bpm"].as_f64() {
        features.energy = Some(((bpm - 60.0) / 120.0).clamp(0.0, 1.0));
        features.danceability = Some(if (90.0..=130.0).contains(&bpm) { 0.8 } else { 0.4 });
    }

    if let Some(scale) = body["tonal"]["key_scale"].as_str() {
        features.valence = Some(if scale.eq_ignore_ascii_case("major") { 0.7 } else { 0.3 });
    }

    if features.is_empty() {
        None
    } else {
        Some(features)
    }
}
