use crate::models::{AspectRatio, ImagePayload};
use crate::providers::GatewayError;

/// The four generation capabilities the studio drives. Each call is a single
/// request/response with no partial results; implementations are expected to
/// impose their own timeouts and surface every failure as a [`GatewayError`].
pub trait GenerationGateway: Send + Sync {
    /// Background removal / cleanup. The returned payload is always PNG.
    fn prepare_image(&self, image: &ImagePayload) -> Result<ImagePayload, GatewayError>;

    /// Compose the prepared product into the described scene. The returned
    /// payload is always JPEG.
    fn generate_ad(
        &self,
        image: &ImagePayload,
        scene: &str,
        aspect: AspectRatio,
    ) -> Result<ImagePayload, GatewayError>;

    /// Text-to-video prompt paragraph for the finished ad.
    fn generate_video_prompt(
        &self,
        image: &ImagePayload,
        scene: &str,
    ) -> Result<String, GatewayError>;

    /// Scene suggestion derived from the product image alone.
    fn generate_random_scene(&self, image: &ImagePayload) -> Result<String, GatewayError>;
}
