//! QR code rendering for business profile links.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, imageops};
use qrcode::QrCode;

use directory_core::config::DirectoryConfig;
use directory_core::error::{AppError, ErrorKind};
use directory_core::result::AppResult;

/// Content type of rendered codes.
pub const QR_CONTENT_TYPE: &str = "image/png";

/// Storage path of the QR asset for a business slug.
pub fn qr_asset_path(slug: &str) -> String {
    format!("qr-codes/{slug}.png")
}

/// Renders square PNG QR codes of at least a configured edge length.
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    min_size_px: u32,
    margin_modules: u32,
}

impl QrRenderer {
    /// Create a renderer.
    pub fn new(min_size_px: u32, margin_modules: u32) -> Self {
        Self {
            min_size_px: min_size_px.max(1),
            margin_modules,
        }
    }

    /// Create a renderer from directory settings.
    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(config.qr_size_px, config.qr_margin)
    }

    /// Encode `content` as a PNG.
    pub fn render(&self, content: &str) -> AppResult<Bytes> {
        let code = QrCode::new(content.as_bytes())
            .map_err(|e| AppError::internal(format!("Failed to encode QR code: {e}")))?;

        let modules = code.width() as u32 + 2 * self.margin_modules;
        let module_px = self.min_size_px.div_ceil(modules).max(1);
        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(module_px, module_px)
            .build();

        let edge = modules * module_px;
        let mut canvas = ImageBuffer::from_pixel(edge, edge, Luma([255u8]));
        let offset = i64::from(self.margin_modules * module_px);
        imageops::overlay(&mut canvas, &symbol, offset, offset);

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to encode PNG", e))?;
        Ok(Bytes::from(png.into_inner()))
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::from_config(&DirectoryConfig::default())
    }
}
