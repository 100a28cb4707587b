//! Texture resources and decoding

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

/// Media types the loader accepts. Anything else is rejected per item
/// without touching the rest of the batch.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/gif",
    "image/avif",
];

/// Error type for texture ingestion operations
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Image decoding error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An undecoded user image, as selected in the UI.
///
/// Ephemeral: consumed by the batch loader and discarded after the
/// decode attempt.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Display name, usually the original file name
    pub name: String,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
    /// Raw encoded bytes
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Size of the encoded payload in bytes
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }

    /// Check the declared media type against the allow-list.
    ///
    /// A bare subtype ("png") is accepted as shorthand for "image/png".
    pub fn media_type_allowed(&self) -> bool {
        let declared = self.media_type.trim();
        ALLOWED_MEDIA_TYPES.iter().any(|allowed| {
            declared.eq_ignore_ascii_case(allowed)
                || declared.eq_ignore_ascii_case(&allowed["image/".len()..])
        })
    }
}

/// Texture wrap behavior along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    Clamp,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Linear,
    Nearest,
}

/// Sampling state attached to every decoded texture.
///
/// Defaults match the folded-mesh UV convention: repeat on both axes,
/// no vertical flip, mipmaps on, linear filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSettings {
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub mipmaps: bool,
    pub flip_y: bool,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            mipmaps: true,
            flip_y: false,
        }
    }
}

/// A decoded, library-ready texture.
///
/// Pixel data is shared behind an `Arc` so the single-texture atlas
/// passthrough and render snapshots never copy the raster.
#[derive(Debug, Clone)]
pub struct LoadedTexture {
    pub name: String,
    pub image: Arc<RgbaImage>,
    pub sampler: SamplerSettings,
}

impl LoadedTexture {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image: Arc::new(image),
            sampler: SamplerSettings::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode encoded image bytes into a library-ready texture
pub fn decode_texture(source: &SourceImage) -> Result<LoadedTexture, TextureError> {
    let img = image::load_from_memory(&source.bytes)
        .map_err(|e| TextureError::Decode(e.to_string()))?;
    Ok(LoadedTexture::new(source.name.clone(), img.to_rgba8()))
}
