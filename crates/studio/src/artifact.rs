use crate::WorkflowError;
use generation::ImagePayload;
use image::ImageFormat;

/// An image at one of the three stations of the workflow: the upload, the
/// prepared product, or the finished ad. Carries both the raw payload (what
/// the gateway consumes) and a `data:` URL (what a front end renders).
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    pub payload: ImagePayload,
    pub url: String,
}

impl ImageArtifact {
    pub fn new(payload: ImagePayload) -> Self {
        let url = payload.to_data_url();
        Self { payload, url }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.payload.data
    }

    pub fn mime(&self) -> &str {
        &self.payload.mime
    }
}

/// Decode an uploaded file into an artifact. PNG, JPEG and WEBP are accepted;
/// the MIME type is derived from the sniffed format, not from the file name.
pub fn decode_upload(bytes: Vec<u8>) -> Result<ImageArtifact, WorkflowError> {
    let format = image::guess_format(&bytes)
        .map_err(|_| WorkflowError::Decode("not a recognizable image file".to_string()))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) {
        return Err(WorkflowError::Decode(format!(
            "unsupported image format {format:?}; use PNG, JPG or WEBP"
        )));
    }
    image::load_from_memory_with_format(&bytes, format)
        .map_err(|err| WorkflowError::Decode(err.to_string()))?;
    let mime = format.to_mime_type();
    Ok(ImageArtifact::new(ImagePayload::new(bytes, mime)))
}
