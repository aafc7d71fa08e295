use base64::Engine;
use image::Rgb;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

use croptrace_core::EncodedPayload;

/// Byte capacity of the adopted QR tier: version 40, error-correction
/// level M, byte mode. Payloads above this fail with
/// [`RenderError::PayloadTooLarge`] rather than producing a truncated or
/// corrupted image.
pub const MAX_PAYLOAD_BYTES: usize = 2331;

/// Errors that can occur while rendering a payload into a visual code.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The serialized payload exceeds the capacity of the adopted QR tier.
    #[error("payload size {size} exceeds QR capacity {max}")]
    PayloadTooLarge {
        /// Actual payload size in bytes.
        size: usize,
        /// Capacity ceiling in bytes.
        max: usize,
    },
    /// QR module or PNG encoding failed.
    #[error("image encoding failed: {0}")]
    Encoding(String),
}

/// Rendering options supplied by the caller.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Minimum rendered size of the image in pixels (both dimensions).
    pub pixel_width: u32,
    /// Whether to attach a human-readable label block to the result.
    pub include_metadata: bool,
    /// Module (dark) color as RGB. Defaults to black.
    pub foreground: [u8; 3],
    /// Background (light) color as RGB. Defaults to white. Contrast
    /// between the two colors is the caller's responsibility.
    pub background: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pixel_width: 300,
            include_metadata: false,
            foreground: [0, 0, 0],
            background: [255, 255, 255],
        }
    }
}

/// Human-readable label describing the rendered code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMetadata {
    /// Display label, e.g. `batch_tracking BCH001`.
    pub label: String,
    /// When the underlying envelope was generated.
    pub generated_at: String,
}

/// A rendered visual code artifact.
#[derive(Debug, Clone)]
pub struct RenderedQr {
    /// PNG image as a `data:image/png;base64,…` URL.
    pub image_data_url: String,
    /// Scan endpoint carried by the envelope.
    pub scan_url: String,
    /// Label block, present when requested via options.
    pub metadata: Option<QrMetadata>,
}

/// Renders encoded payloads into scannable PNG artifacts.
///
/// Error-correction level M is fixed: it tolerates ~15% module damage while
/// leaving enough capacity for full batch envelopes. The payload string is
/// embedded byte-for-byte, so a standard reader yields back exactly the
/// string that was encoded.
#[derive(Debug, Default)]
pub struct QrRenderer;

impl QrRenderer {
    /// Creates a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Renders an encoded payload into a PNG data URL.
    pub fn render(
        &self,
        encoded: &EncodedPayload,
        options: &RenderOptions,
    ) -> Result<RenderedQr, RenderError> {
        let payload = encoded.payload.as_bytes();
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(RenderError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_BYTES,
            });
        }

        let code = QrCode::with_error_correction_level(payload, EcLevel::M).map_err(|e| {
            match e {
                QrError::DataTooLong => RenderError::PayloadTooLarge {
                    size: payload.len(),
                    max: MAX_PAYLOAD_BYTES,
                },
                other => RenderError::Encoding(other.to_string()),
            }
        })?;

        let image = code
            .render::<Rgb<u8>>()
            .dark_color(Rgb(options.foreground))
            .light_color(Rgb(options.background))
            .min_dimensions(options.pixel_width, options.pixel_width)
            .build();

        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| RenderError::Encoding(e.to_string()))?;

        let image_data_url = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&png)
        );

        let metadata = options.include_metadata.then(|| QrMetadata {
            label: format!(
                "{} {}",
                encoded.envelope.kind,
                encoded.envelope.data.business_key()
            ),
            generated_at: encoded.envelope.generated_at.as_ref().to_string(),
        });

        Ok(RenderedQr {
            image_data_url,
            scan_url: encoded.envelope.urls.scan.clone(),
            metadata,
        })
    }
}
