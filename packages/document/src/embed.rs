//! Video URL normalization.
//!
//! Video elements keep the URL the user pasted in `src` and the URL the canvas
//! actually embeds in `embedUrl`.

use regex::Regex;
use std::sync::LazyLock;

const EMBED_PREFIX: &str = "https://www.youtube.com/embed/";

static YOUTUBE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^"&?/\s]{11})"#)
            .expect("static regex"),
        Regex::new(r#"youtube\.com/shorts/([^"&?/\s]{11})"#).expect("static regex"),
        Regex::new(r#"youtube\.com/live/([^"&?/\s]{11})"#).expect("static regex"),
    ]
});

/// Convert a YouTube watch/short/live/share URL into its embed URL.
/// Anything else is returned unchanged.
pub fn normalize_embed_url(url: &str) -> String {
    YOUTUBE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|video_id| format!("{EMBED_PREFIX}{}", video_id.as_str()))
        .unwrap_or_else(|| url.to_string())
}

/// Whether `url` normalizes to something the canvas can embed
pub fn is_embeddable(url: &str) -> bool {
    normalize_embed_url(url).contains("youtube.com/embed/")
}
