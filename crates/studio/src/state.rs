use crate::artifact::ImageArtifact;
use serde::{Deserialize, Serialize};

/// The three stations of the studio journey. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Prepare,
    Design,
    Finalize,
}

/// The generated advertisement plus the id of its history entry, kept so a
/// later video-prompt generation can amend that entry in place.
#[derive(Debug, Clone)]
pub struct FinalAd {
    pub artifact: ImageArtifact,
    pub history_id: String,
}

/// Everything the front end needs to render the studio. Owned and mutated
/// exclusively by the controller; the front end only ever sees a `&` view.
#[derive(Debug)]
pub struct WorkflowState {
    pub step: Step,
    /// The upload, never mutated after it lands.
    pub original: Option<ImageArtifact>,
    /// Background-removed product, or a pass-through copy of the original
    /// until an explicit prepare runs.
    pub prepared: Option<ImageArtifact>,
    pub final_ad: Option<FinalAd>,
    /// Live scene text, editable until a design submits it.
    pub scene: String,
    /// Scene text as it stood when the current ad was generated; this is the
    /// provenance used for the video prompt and the history entry, even if
    /// the live text has since been edited.
    pub submitted_scene: String,
    pub video_prompt: Option<String>,
    /// True only after a successful prepare in the current upload lineage.
    pub has_prepared: bool,
    /// Most recent recoverable failure, replaced on every new attempt.
    pub last_error: Option<String>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            step: Step::Prepare,
            original: None,
            prepared: None,
            final_ad: None,
            scene: String::new(),
            submitted_scene: String::new(),
            video_prompt: None,
            has_prepared: false,
            last_error: None,
        }
    }
}
