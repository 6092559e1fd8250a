//! Model gateways: turn an assembled instruction (plus optional images) into
//! generated text. Gateways are stateless and never retry.

pub mod gemini;

use async_trait::async_trait;

use crate::error::GatewayError;

pub use gemini::GeminiGateway;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A base64 image sent alongside an instruction.
///
/// Accepts either bare base64 or a `data:image/<kind>;base64,` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    mime_type: String,
    data: String,
}

impl ImageAttachment {
    pub fn from_base64(encoded: &str) -> Self {
        let encoded = encoded.trim();
        if let Some(rest) = encoded.strip_prefix("data:") {
            if let Some((mime, data)) = rest.split_once(";base64,") {
                if mime.starts_with("image/") {
                    return Self {
                        mime_type: mime.to_string(),
                        data: data.to_string(),
                    };
                }
            }
        }
        Self {
            mime_type: DEFAULT_IMAGE_MIME.to_string(),
            data: encoded.to_string(),
        }
    }

    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without any data-URI prefix.
    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Text generation backend consumed by the coach.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Report a missing credential before any turn is processed.
    fn check_configured(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    /// Generate a response for `instruction`, with optional images.
    async fn generate(
        &self,
        instruction: &str,
        images: &[ImageAttachment],
    ) -> Result<String, GatewayError>;
}
