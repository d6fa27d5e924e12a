use super::GatewayError;
use crate::gateway::GenerationGateway;
use crate::models::{AspectRatio, ImagePayload};
use crate::prompts;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

const PNG: &str = "image/png";
const JPEG: &str = "image/jpeg";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model used for the two image-editing capabilities.
    pub image_model: String,
    /// Model used for the two text capabilities.
    pub text_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

pub struct GeminiGateway {
    config: GeminiConfig,
    agent: ureq::Agent,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::configuration(
                "Gemini API key is required.".to_string(),
            ));
        }
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(20))
            .timeout_read(Duration::from_secs(120))
            .timeout_write(Duration::from_secs(20))
            .build();
        Ok(Self { config, agent })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            GEMINI_API_BASE.trim_end_matches('/'),
            model.trim(),
            urlencoding::encode(self.config.api_key.trim())
        )
    }

    fn generate(
        &self,
        model: &str,
        image: &ImagePayload,
        prompt: &str,
        expect_image: bool,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let mut payload = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.mime, "data": image.base64() } },
                    { "text": prompt },
                ]
            }]
        });
        if expect_image {
            payload["generationConfig"] = json!({ "responseModalities": ["IMAGE"] });
        }
        log::debug!("gemini {model} call with {} image bytes", image.data.len());
        let response = self
            .agent
            .post(&self.endpoint(model))
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_string(&payload.to_string())
            .map_err(|err| GatewayError::transport(format!("Gemini request failed: {err}")))?;
        let body = response.into_string().map_err(|err| {
            GatewayError::transport(format!("Read Gemini response failed: {err}"))
        })?;
        parse_response(&body)
    }

    fn generate_image(
        &self,
        image: &ImagePayload,
        prompt: &str,
        out_mime: &str,
        missing: &str,
    ) -> Result<ImagePayload, GatewayError> {
        let response = self.generate(&self.config.image_model, image, prompt, true)?;
        let encoded = extract_inline_image(&response)
            .ok_or_else(|| GatewayError::invalid_response(missing.to_string()))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|err| {
                GatewayError::invalid_response(format!("Gemini returned undecodable image data: {err}"))
            })?;
        Ok(ImagePayload::new(bytes, out_mime))
    }

    fn generate_text(&self, image: &ImagePayload, prompt: &str) -> Result<String, GatewayError> {
        let response = self.generate(&self.config.text_model, image, prompt, false)?;
        let text = extract_text(&response);
        if text.trim().is_empty() {
            return Err(GatewayError::invalid_response(
                "Gemini response contained no text.".to_string(),
            ));
        }
        Ok(text)
    }
}

impl GenerationGateway for GeminiGateway {
    fn prepare_image(&self, image: &ImagePayload) -> Result<ImagePayload, GatewayError> {
        self.generate_image(
            image,
            prompts::PREPARE_IMAGE_PROMPT,
            PNG,
            "Failed to enhance image. The model did not return an image.",
        )
    }

    fn generate_ad(
        &self,
        image: &ImagePayload,
        scene: &str,
        aspect: AspectRatio,
    ) -> Result<ImagePayload, GatewayError> {
        self.generate_image(
            image,
            &prompts::ad_prompt(scene, aspect),
            JPEG,
            "Failed to create CGI ad. The model did not return an image.",
        )
    }

    fn generate_video_prompt(
        &self,
        image: &ImagePayload,
        scene: &str,
    ) -> Result<String, GatewayError> {
        self.generate_text(image, &prompts::video_prompt(scene))
    }

    fn generate_random_scene(&self, image: &ImagePayload) -> Result<String, GatewayError> {
        self.generate_text(image, prompts::random_scene_prompt())
    }
}

fn parse_response(body: &str) -> Result<GenerateContentResponse, GatewayError> {
    serde_json::from_str(body).map_err(|err| {
        GatewayError::invalid_response(format!("Invalid Gemini response JSON: {err}; raw: {body}"))
    })
}

/// First inline-data part of the first candidate, if any.
fn extract_inline_image(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .as_ref()?
        .iter()
        .find_map(|part| part.inline_data.as_ref().map(|data| data.data.clone()))
}

/// All text parts of the first candidate, joined.
fn extract_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.as_ref())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[allow(dead_code)]
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Option<Vec<GeminiPart>>,
    #[allow(dead_code)]
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData")]
    inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Deserialize)]
struct GeminiInlineData {
    #[allow(dead_code)]
    #[serde(default, rename = "mimeType")]
    mime_type: Option<String>,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        assert!(GeminiGateway::new(GeminiConfig::default()).is_err());
    }

    #[test]
    fn extracts_first_inline_image_part() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "here is your ad"},
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let parsed = parse_response(body).unwrap();
        assert_eq!(extract_inline_image(&parsed).as_deref(), Some("AQID"));
    }

    #[test]
    fn missing_image_part_yields_none() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "sorry"}]}}]}"#;
        let parsed = parse_response(body).unwrap();
        assert!(extract_inline_image(&parsed).is_none());
        assert_eq!(extract_text(&parsed), "sorry");
    }

    #[test]
    fn empty_candidates_parse_cleanly() {
        let parsed = parse_response("{}").unwrap();
        assert!(parsed.candidates.is_empty());
        assert_eq!(extract_text(&parsed), "");
    }
}
