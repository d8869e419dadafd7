use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::mood::MoodProfile;
use super::{AudioFeatures, Track};

/// Distance-based score for tracks with known audio features: 1.0 is a
/// perfect match on all three axes, 0.0 a maximal mismatch. Dimensions the
/// lookup did not provide count as the neutral 0.5.
pub fn feature_match(target: &MoodProfile, features: &AudioFeatures) -> f64 {
    let energy_diff = (target.energy - features.energy.unwrap_or(0.5)).abs();
    let valence_diff = (target.valence - features.valence.unwrap_or(0.5)).abs();
    let dance_diff = (target.danceability - features.danceability.unwrap_or(0.5)).abs();
    1.0 - (energy_diff + valence_diff + dance_diff) / 3.0
}

struct Tier {
    terms: &'static [&'static str],
    unless: &'static [&'static str],
    bonus: f64,
}

struct Category {
    triggers: &'static [&'static str],
    tiers: &'static [Tier],
}

// Categories are independent and additive: analysis text that triggers
// several of them stacks their bonuses.
const CATEGORIES: &[Category] = &[
    Category {
        triggers: &["energetic", "vibrant", "upbeat", "bright", "lively", "joyful"],
        tiers: &[
            Tier { terms: &["dance", "party", "beat", "pump", "energy", "power"], unless: &[], bonus: 3.0 },
            Tier { terms: &["pop", "rock", "edm", "electronic"], unless: &["slow"], bonus: 2.0 },
            Tier { terms: &["fast", "high", "up", "jump", "move"], unless: &[], bonus: 1.5 },
        ],
    },
    Category {
        triggers: &["peaceful", "calm", "serene", "tranquil", "gentle", "soft"],
        tiers: &[
            Tier { terms: &["acoustic", "piano", "guitar", "strings"], unless: &[], bonus: 3.0 },
            Tier { terms: &["chill", "relax", "calm", "quiet", "soft", "gentle"], unless: &[], bonus: 2.5 },
            Tier { terms: &["ambient", "meditation", "spa", "sleep"], unless: &[], bonus: 2.0 },
            Tier { terms: &["slow", "ballad"], unless: &[], bonus: 1.5 },
        ],
    },
    Category {
        triggers: &["dramatic", "intense", "powerful", "bold"],
        tiers: &[
            Tier { terms: &["epic", "symphony", "orchestra", "cinematic"], unless: &[], bonus: 3.0 },
            Tier { terms: &["dramatic", "intense", "powerful", "heavy"], unless: &[], bonus: 2.5 },
            Tier { terms: &["dark", "metal", "rock"], unless: &[], bonus: 2.0 },
        ],
    },
    Category {
        triggers: &["romantic", "warm", "intimate", "sunset"],
        tiers: &[
            Tier { terms: &["love", "heart", "romance", "kiss"], unless: &[], bonus: 3.0 },
            Tier { terms: &["slow", "ballad", "tender", "sweet"], unless: &[], bonus: 2.0 },
            Tier { terms: &["jazz", "soul", "r&b"], unless: &[], bonus: 1.5 },
        ],
    },
];

/// Text-heuristic scorer for tracks without audio features. Scores are
/// non-negative and unbounded: a per-track tie-break term in
/// [0, jitter) plus graded bonuses for mood-vocabulary matches in the
/// track's name and artist.
pub struct KeywordScorer {
    jitter: f64,
}

impl KeywordScorer {
    pub fn new(jitter: f64) -> Self {
        KeywordScorer { jitter }
    }

    /// `analysis` must already be lower-cased by the caller.
    pub fn score(&self, track: &Track, analysis: &str) -> f64 {
        let combined = format!("{} {}", track.name, track.artist).to_lowercase();
        let mut score = self.jitter_for(&combined);

        for category in CATEGORIES {
            if !category.triggers.iter().any(|t| analysis.contains(t)) {
                continue;
            }
            for tier in category.tiers {
                let matched = tier.terms.iter().any(|t| combined.contains(t));
                let excluded = tier.unless.iter().any(|t| combined.contains(t));
                if matched && !excluded {
                    score += tier.bonus;
                }
            }
        }

        score
    }

    // Tie-break term derived from a stable hash of the track text, so the
    // same (track, amplitude) pair always scores identically.
    fn jitter_for(&self, combined: &str) -> f64 {
        if self.jitter == 0.0 {
            return 0.0;
        }
        let mut hasher = DefaultHasher::new();
        combined.hash(&mut hasher);
        hasher.finish() as f64 / u64::MAX as f64 * self.jitter
    }
}
