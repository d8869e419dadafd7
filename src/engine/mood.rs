/// Target mood derived from analysis text. Every dimension is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodProfile {
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
}

pub const NEUTRAL: MoodProfile = MoodProfile {
    energy: 0.5,
    valence: 0.5,
    danceability: 0.5,
};

struct MoodRule {
    triggers: &'static [&'static str],
    profile: MoodProfile,
}

// Evaluated in priority order: the first rule with a trigger present in the
// text wins, even when later rules would also match.
const MOOD_RULES: &[MoodRule] = &[
    MoodRule {
        triggers: &["energetic", "vibrant", "upbeat"],
        profile: MoodProfile { energy: 0.8, valence: 0.7, danceability: 0.7 },
    },
    MoodRule {
        triggers: &["calm", "peaceful", "serene"],
        profile: MoodProfile { energy: 0.2, valence: 0.6, danceability: 0.3 },
    },
    MoodRule {
        triggers: &["dramatic", "intense", "powerful"],
        profile: MoodProfile { energy: 0.7, valence: 0.3, danceability: 0.4 },
    },
];

/// Maps free-form analysis text onto a target mood profile. Unrecognized
/// text lands on the neutral profile.
pub fn extract(text: &str) -> MoodProfile {
    let text = text.to_lowercase();
    MOOD_RULES
        .iter()
        .find(|rule| rule.triggers.iter().any(|t| text.contains(t)))
        .map(|rule| rule.profile)
        .unwrap_or(NEUTRAL)
}

const GENRE_QUERIES: &[(&str, &str)] = &[
    ("pop", "pop music"),
    ("rock", "rock music"),
    ("jazz", "jazz"),
    ("electronic", "electronic music"),
    ("acoustic", "acoustic"),
    ("indie", "indie music"),
];

/// Derives a generic track-search query from analysis text, used when no
/// playlist candidates are in play.
pub fn search_query(text: &str) -> &'static str {
    let text = text.to_lowercase();
    GENRE_QUERIES
        .iter()
        .find(|(genre, _)| text.contains(genre))
        .map(|(_, query)| *query)
        .unwrap_or("chill music")
}
