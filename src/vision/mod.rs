//! Image mood analysis. With an OpenAI key and image bytes the description
//! comes from the vision model; otherwise filename heuristics produce one of
//! the canned analyses. Either way the caller always gets analysis text.

use base64::Engine;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::warn;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANALYSIS_PROMPT: &str = "Analyze this image and describe the mood, setting, and suggest \
    what type of music would match this scene. Be specific about the atmosphere.";

const FILENAME_BUCKETS: &[(&[&str], &str)] = &[
    (
        &["sunset", "dawn", "golden"],
        "This image captures a warm, golden hour scene with soft, romantic lighting. The \
         atmosphere is peaceful and contemplative, suggesting music with gentle melodies, \
         acoustic elements, or ambient soundscapes that evoke tranquility and warmth.",
    ),
    (
        &["party", "concert", "dance"],
        "This image shows a vibrant, high-energy scene full of movement and excitement. The \
         mood is energetic and celebratory, perfect for upbeat tracks with strong rhythms, \
         electronic beats, or danceable pop music that matches this lively atmosphere.",
    ),
    (
        &["night", "dark", "storm"],
        "This image has a dramatic, moody atmosphere with deep contrasts and mysterious \
         elements. The scene calls for intense, atmospheric music - perhaps alternative rock, \
         cinematic scores, or electronic music with darker undertones.",
    ),
    (
        &["nature", "forest", "mountain"],
        "This image depicts a serene natural landscape that evokes peace and connection with \
         nature. The mood suggests organic, acoustic music - folk songs, classical pieces, or \
         ambient nature sounds that complement this tranquil outdoor setting.",
    ),
];

const CANNED_MOODS: &[&str] = &[
    "This image radiates energy and vibrancy with bright colors and dynamic composition. The \
     uplifting mood calls for high-energy music - think pop hits, rock anthems, or electronic \
     dance tracks that match this lively, positive atmosphere.",
    "This image conveys a sense of peace and tranquility with soft lighting and gentle \
     composition. The serene atmosphere pairs beautifully with ambient music, acoustic folk, \
     or classical pieces that enhance this meditative, restful mood.",
    "This image has a powerful, intense atmosphere with striking contrasts and bold elements. \
     The dramatic mood suggests cinematic music, orchestral pieces, or alternative rock that \
     captures this scene's emotional depth and intensity.",
    "This image evokes quiet contemplation and inner peace with harmonious elements and \
     balanced composition. The gentle mood calls for soothing instrumentals, soft vocals, or \
     nature-inspired ambient tracks.",
    "This image bursts with color and life, creating an optimistic and joyful atmosphere. The \
     cheerful mood pairs perfectly with upbeat indie music, feel-good pop songs, or world \
     music that celebrates life and positivity.",
];

pub struct ImageAnalyzer {
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ImageAnalyzer {
    pub fn new(api_key: Option<String>) -> Self {
        ImageAnalyzer {
            api_key,
            http: reqwest::Client::new(),
        }
    }

    pub async fn analyze(&self, filename: &str, image: Option<&[u8]>) -> String {
        if let (Some(key), Some(bytes)) = (self.api_key.as_deref(), image) {
            match self.analyze_remote(key, bytes).await {
                Ok(analysis) => return analysis,
                Err(e) => warn!(error = %e, "vision request failed, using filename heuristics"),
            }
        }
        describe_from_filename(filename, image.map_or(0, |bytes| bytes.len()))
    }

    async fn analyze_remote(&self, api_key: &str, image: &[u8]) -> anyhow::Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let body = json!({
            "model": "gpt-4o",
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": ANALYSIS_PROMPT },
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/jpeg;base64,{encoded}") }
                    },
                ],
            }],
            "max_tokens": 300,
        });

        let response: Value = self
            .http
            .post(OPENAI_API_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("no analysis text in response"))
    }
}

// Filename keywords pick a scene description; anything unrecognized lands on
// a canned mood keyed by a stable hash, so the same upload always reads the
// same way.
pub(crate) fn describe_from_filename(filename: &str, payload_size: usize) -> String {
    let name = filename.to_lowercase();

    for (keywords, analysis) in FILENAME_BUCKETS {
        if keywords.iter().any(|k| name.contains(k)) {
            return (*analysis).to_string();
        }
    }

    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    let index = (hasher.finish() as usize).wrapping_add(payload_size) % CANNED_MOODS.len();
    CANNED_MOODS[index].to_string()
}
