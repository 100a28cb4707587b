//! Size-budgeted image compression
//!
//! Reduces a single encoded image until it fits a byte budget: downscale
//! proportionally to `sqrt(budget / size)`, then re-encode as JPEG at
//! stepwise-decreasing quality. Every failure path fails open and returns
//! the original bytes unchanged, so a bad image never blocks its batch.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ExtendedColorType;
use log::{debug, warn};

use crate::progress::{BatchPhase, BatchProgress};
use crate::texture::{SourceImage, TextureError};

/// Quality of the first re-encode attempt
const START_QUALITY: f32 = 0.8;
/// Multiplier applied to the quality between attempts
const QUALITY_STEP: f32 = 0.8;
/// Attempts stop before quality would drop below this floor
const MIN_QUALITY: f32 = 0.3;
/// Upper bound on re-encode attempts per image
const MAX_ATTEMPTS: u32 = 5;

/// Limits for [`SizeBudgetCompressor`]
#[derive(Debug, Clone, Copy)]
pub struct CompressorConfig {
    /// Target encoded size in bytes
    pub budget_bytes: usize,
    /// Largest allowed side after downscaling, in pixels
    pub max_dimension: u32,
    /// Smallest allowed side after downscaling, in pixels
    pub min_dimension: u32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            budget_bytes: 512 * 1024,
            max_dimension: 2048,
            min_dimension: 64,
        }
    }
}

/// Reduces one image to fit a byte budget
#[derive(Debug, Clone, Default)]
pub struct SizeBudgetCompressor {
    config: CompressorConfig,
}

impl SizeBudgetCompressor {
    pub fn new(config: CompressorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Compress `source` to fit the configured budget.
    ///
    /// Within-budget inputs (zero-byte inputs included) pass through
    /// byte-identical. The result is never larger than the input: when the
    /// best re-encode would grow the payload, the original wins.
    pub fn compress(&self, source: SourceImage) -> SourceImage {
        self.compress_tracked(source, None)
    }

    /// [`compress`](Self::compress) with phase reporting on a batch handle
    pub fn compress_tracked(
        &self,
        source: SourceImage,
        progress: Option<&BatchProgress>,
    ) -> SourceImage {
        if source.byte_size() <= self.config.budget_bytes {
            return source;
        }

        match self.shrink(&source, progress) {
            Ok(shrunk) if shrunk.byte_size() <= source.byte_size() => {
                debug!(
                    "compressed '{}': {} -> {} bytes (budget {})",
                    source.name,
                    source.byte_size(),
                    shrunk.byte_size(),
                    self.config.budget_bytes
                );
                shrunk
            }
            Ok(_) => {
                debug!(
                    "re-encode of '{}' grew the payload, keeping original",
                    source.name
                );
                source
            }
            Err(e) => {
                warn!("compression of '{}' failed open: {}", source.name, e);
                source
            }
        }
    }

    /// Target dimensions for an over-budget image: proportional shrink,
    /// clamped to the minimum floor, then capped so the larger side equals
    /// the maximum dimension.
    fn target_dimensions(&self, width: u32, height: u32, size: usize) -> (u32, u32) {
        let scale = (self.config.budget_bytes as f64 / size as f64).sqrt();
        let mut w = ((width as f64 * scale).round() as u32).max(self.config.min_dimension);
        let mut h = ((height as f64 * scale).round() as u32).max(self.config.min_dimension);

        let larger = w.max(h);
        if larger > self.config.max_dimension {
            let cap = self.config.max_dimension as f64 / larger as f64;
            if w >= h {
                h = ((h as f64 * cap).round() as u32).max(1);
                w = self.config.max_dimension;
            } else {
                w = ((w as f64 * cap).round() as u32).max(1);
                h = self.config.max_dimension;
            }
        }

        (w.max(1), h.max(1))
    }

    fn shrink(
        &self,
        source: &SourceImage,
        progress: Option<&BatchProgress>,
    ) -> Result<SourceImage, TextureError> {
        if let Some(p) = progress {
            p.set_phase(BatchPhase::Compressing);
        }

        let img = image::load_from_memory(&source.bytes)
            .map_err(|e| TextureError::Decode(e.to_string()))?;
        let (new_w, new_h) =
            self.target_dimensions(img.width(), img.height(), source.byte_size());

        if let Some(p) = progress {
            p.set_phase(BatchPhase::Resizing);
        }
        let rgb = img.resize_exact(new_w, new_h, FilterType::Lanczos3).to_rgb8();

        let mut quality = START_QUALITY;
        let mut encoded = Vec::new();
        for attempt in 1..=MAX_ATTEMPTS {
            if let Some(p) = progress {
                p.set_phase(BatchPhase::Optimizing(attempt));
            }
            debug!(
                "re-encoding '{}' at quality {:.2} (attempt {attempt})",
                source.name, quality
            );

            encoded.clear();
            let mut encoder =
                JpegEncoder::new_with_quality(&mut encoded, (quality * 100.0).round() as u8);
            encoder
                .encode(rgb.as_raw(), new_w, new_h, ExtendedColorType::Rgb8)
                .map_err(|e| TextureError::Decode(e.to_string()))?;

            if encoded.len() <= self.config.budget_bytes {
                break;
            }
            quality *= QUALITY_STEP;
            if quality < MIN_QUALITY {
                break;
            }
        }

        // Over budget after the last attempt is still a valid result.
        Ok(SourceImage::new(
            source.name.clone(),
            "image/jpeg",
            encoded,
        ))
    }
}
