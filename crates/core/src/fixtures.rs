//! Static emote fixtures served by the mock API.
//!
//! Two fixed sets exist: the global set (one `OPENHYPE` emote) and the
//! channel set (one `OPENWAVE` emote). Both are built once at startup and
//! never mutated; every channel request receives the same channel set
//! regardless of which channel was asked for.

use serde::{Deserialize, Serialize};

/// Size-keyed CDN URLs for a single emote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmoteUrls {
    #[serde(rename = "1x")]
    pub small: String,
    #[serde(rename = "2x")]
    pub medium: String,
    #[serde(rename = "4x")]
    pub large: String,
}

/// A single emote descriptor as the OpenEmote client expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Emote {
    pub code: String,
    pub urls: EmoteUrls,
    pub tooltip: String,
    pub homepage: String,
}

/// A set of emotes, the top-level payload of the emote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmoteSet {
    pub emotes: Vec<Emote>,
}

impl EmoteSet {
    /// The global emote fixture.
    pub fn global() -> Self {
        Self {
            emotes: vec![Emote {
                code: "OPENHYPE".into(),
                urls: EmoteUrls {
                    small: "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/1.0".into(),
                    medium: "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/2.0".into(),
                    large: "https://static-cdn.jtvnw.net/emoticons/v2/25/default/dark/3.0".into(),
                },
                tooltip: "OpenEmote mock global".into(),
                homepage: "https://example.com/openhype".into(),
            }],
        }
    }

    /// The channel emote fixture.
    pub fn channel() -> Self {
        Self {
            emotes: vec![Emote {
                code: "OPENWAVE".into(),
                urls: EmoteUrls {
                    small: "https://static-cdn.jtvnw.net/emoticons/v2/1902/default/dark/1.0".into(),
                    medium: "https://static-cdn.jtvnw.net/emoticons/v2/1902/default/dark/2.0".into(),
                    large: "https://static-cdn.jtvnw.net/emoticons/v2/1902/default/dark/3.0".into(),
                },
                tooltip: "OpenEmote mock channel".into(),
                homepage: "https://example.com/openwave".into(),
            }],
        }
    }
}
