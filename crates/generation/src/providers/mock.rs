use super::GatewayError;
use crate::gateway::GenerationGateway;
use crate::models::{AspectRatio, ImagePayload};
use crossbeam_channel::Receiver;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Canned outputs for the four capabilities. Anything left `None` falls back
/// to a stable stub so a default script behaves like a well-behaved backend.
#[derive(Clone, Debug, Default)]
pub struct MockScript {
    pub prepared_image: Option<Vec<u8>>,
    pub ad_image: Option<Vec<u8>>,
    pub video_prompt: Option<String>,
    pub random_scene: Option<String>,
}

/// One recorded invocation, for asserting on what the caller actually sent.
#[derive(Clone, Debug, PartialEq)]
pub enum MockCall {
    PrepareImage,
    GenerateAd { scene: String, aspect: AspectRatio },
    GenerateVideoPrompt { scene: String },
    GenerateRandomScene,
}

pub struct MockGateway {
    script: MockScript,
    failures: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<MockCall>>,
    /// When set, every capability blocks until the test releases one `()`.
    gate: Option<Receiver<()>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::with_script(MockScript::default())
    }

    pub fn with_script(script: MockScript) -> Self {
        Self {
            script,
            failures: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every response until the test sends `()` on the paired channel.
    pub fn gated(mut self, gate: Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Queue a failure; the next capability call consumes it and errors.
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.failures
            .lock()
            .expect("mock failure queue poisoned")
            .push_back(message.into());
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn enter(&self, call: MockCall) -> Result<(), GatewayError> {
        if let Some(gate) = &self.gate {
            // A dropped sender releases the gate rather than wedging the test.
            let _ = gate.recv();
        }
        self.calls.lock().expect("mock call log poisoned").push(call);
        if let Some(message) = self
            .failures
            .lock()
            .expect("mock failure queue poisoned")
            .pop_front()
        {
            return Err(GatewayError::transport(message));
        }
        Ok(())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationGateway for MockGateway {
    fn prepare_image(&self, _image: &ImagePayload) -> Result<ImagePayload, GatewayError> {
        self.enter(MockCall::PrepareImage)?;
        let bytes = self
            .script
            .prepared_image
            .clone()
            .unwrap_or_else(|| b"mock-prepared-png".to_vec());
        Ok(ImagePayload::new(bytes, "image/png"))
    }

    fn generate_ad(
        &self,
        _image: &ImagePayload,
        scene: &str,
        aspect: AspectRatio,
    ) -> Result<ImagePayload, GatewayError> {
        self.enter(MockCall::GenerateAd {
            scene: scene.to_string(),
            aspect,
        })?;
        let bytes = self
            .script
            .ad_image
            .clone()
            .unwrap_or_else(|| b"mock-ad-jpeg".to_vec());
        Ok(ImagePayload::new(bytes, "image/jpeg"))
    }

    fn generate_video_prompt(
        &self,
        _image: &ImagePayload,
        scene: &str,
    ) -> Result<String, GatewayError> {
        self.enter(MockCall::GenerateVideoPrompt {
            scene: scene.to_string(),
        })?;
        Ok(self.script.video_prompt.clone().unwrap_or_else(|| {
            "A slow, dramatic dolly zoom toward the product while soft ambient light shifts across the scene."
                .to_string()
        }))
    }

    fn generate_random_scene(&self, _image: &ImagePayload) -> Result<String, GatewayError> {
        self.enter(MockCall::GenerateRandomScene)?;
        Ok(self.script.random_scene.clone().unwrap_or_else(|| {
            "A gigantic version of the product rises out of a calm harbor at golden hour, towering over the skyline."
                .to_string()
        }))
    }
}
