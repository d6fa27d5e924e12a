use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Displayable reference to a generated ad. Only the renderable handle is
/// persisted; the raw bytes stay with the live workflow session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdImage {
    pub url: String,
}

/// One completed ad generation. Serialized camelCase so the durable format is
/// `{id, timestamp, finalAd: {url}, sceneDescription, videoPrompt}`.
///
/// Immutable once written, except `video_prompt`, which starts empty and may
/// be filled in once when the user asks for an animation prompt afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub final_ad: AdImage,
    pub scene_description: String,
    pub video_prompt: String,
}

/// Entry data as supplied by a caller; id and timestamp are assigned by the
/// log on append.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub final_ad: AdImage,
    pub scene_description: String,
    pub video_prompt: String,
}
