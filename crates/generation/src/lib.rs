mod gateway;
mod models;
mod prompts;
mod providers;

pub use gateway::GenerationGateway;
pub use models::{AspectRatio, ImagePayload};
pub use prompts::{ad_prompt, random_scene_prompt, video_prompt, PREPARE_IMAGE_PROMPT};
pub use providers::{
    gemini::{GeminiConfig, GeminiGateway, GEMINI_API_BASE},
    mock::{MockCall, MockGateway, MockScript},
    GatewayError,
};
