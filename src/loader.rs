//! Fault-tolerant batch texture loading
//!
//! Decodes an ordered list of source images into library-ready textures.
//! Every item resolves independently: unsupported media types and corrupt
//! images become named failures in the batch result instead of errors, and
//! the batch completes once all items have resolved. Successful textures
//! are collected in the original input order, not completion order.

use std::fmt;

use futures::future::join_all;
use log::debug;

use crate::compress::SizeBudgetCompressor;
use crate::progress::{BatchPhase, BatchProgress};
use crate::texture::{decode_texture, LoadedTexture, SourceImage, TextureError};

/// One item that failed to load, recorded without failing the batch
#[derive(Debug)]
pub struct LoadFailure {
    pub name: String,
    pub reason: TextureError,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Aggregate result of one load batch
///
/// Tagged with the generation token it was started under so the pipeline
/// can discard results from a superseded batch.
#[derive(Debug)]
pub struct LoadedBatch {
    pub generation: u64,
    pub textures: Vec<LoadedTexture>,
    pub failures: Vec<LoadFailure>,
}

/// Decodes batches of user images into library-ready textures
#[derive(Debug, Clone, Default)]
pub struct TextureLoader {
    compressor: SizeBudgetCompressor,
}

impl TextureLoader {
    pub fn new(compressor: SizeBudgetCompressor) -> Self {
        Self { compressor }
    }

    pub fn compressor(&self) -> &SizeBudgetCompressor {
        &self.compressor
    }

    /// Load a batch of source images.
    ///
    /// Individual failures never propagate; `Err` is reserved for faults
    /// not attributable to a single image. Zero successes is a valid empty
    /// result.
    pub async fn load_batch(
        &self,
        generation: u64,
        items: Vec<SourceImage>,
    ) -> crate::Result<LoadedBatch> {
        let progress = BatchProgress::new(items.len());
        self.load_batch_with_progress(generation, items, &progress)
            .await
    }

    /// [`load_batch`](Self::load_batch) reporting phases on `progress`
    pub async fn load_batch_with_progress(
        &self,
        generation: u64,
        items: Vec<SourceImage>,
        progress: &BatchProgress,
    ) -> crate::Result<LoadedBatch> {
        let tasks = items.into_iter().enumerate().map(|(index, item)| {
            let progress = progress.clone();
            async move { (index, self.load_one(item, &progress)) }
        });

        // Relative completion order is unconstrained; reorder by original
        // input index before collecting.
        let mut resolved: Vec<_> = join_all(tasks).await;
        resolved.sort_by_key(|(index, _)| *index);

        let mut textures = Vec::new();
        let mut failures = Vec::new();
        for (_, outcome) in resolved {
            match outcome {
                Ok(tex) => textures.push(tex),
                Err(failure) => failures.push(failure),
            }
        }

        progress.set_phase(BatchPhase::Done);
        debug!(
            "batch {generation} resolved: {} loaded, {} failed",
            textures.len(),
            failures.len()
        );

        Ok(LoadedBatch {
            generation,
            textures,
            failures,
        })
    }

    fn load_one(
        &self,
        item: SourceImage,
        progress: &BatchProgress,
    ) -> Result<LoadedTexture, LoadFailure> {
        let result = self.decode_one(item, progress);
        if result.is_err() {
            progress.set_phase(BatchPhase::Failed);
        }
        progress.mark_resolved();
        result
    }

    fn decode_one(
        &self,
        item: SourceImage,
        progress: &BatchProgress,
    ) -> Result<LoadedTexture, LoadFailure> {
        if !item.media_type_allowed() {
            return Err(LoadFailure {
                name: item.name,
                reason: TextureError::UnsupportedMediaType(item.media_type),
            });
        }

        let compressed = self.compressor.compress_tracked(item, Some(progress));

        progress.set_phase(BatchPhase::Decoding);
        decode_texture(&compressed).map_err(|reason| LoadFailure {
            name: compressed.name.clone(),
            reason,
        })
    }
}

/// Async file ingestion, available with the `runtime-tokio` feature
#[cfg(feature = "runtime-tokio")]
impl TextureLoader {
    /// Read `paths` and load them as one batch.
    ///
    /// The media type is inferred from each file extension; unreadable
    /// files become per-item failures like any other bad input.
    pub async fn load_batch_from_paths<P: AsRef<std::path::Path>>(
        &self,
        generation: u64,
        paths: &[P],
    ) -> anyhow::Result<LoadedBatch> {
        let mut items = Vec::with_capacity(paths.len());
        let mut unreadable = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    let media_type = media_type_for_path(path);
                    items.push(SourceImage::new(name, media_type, bytes));
                }
                Err(e) => unreadable.push(LoadFailure {
                    name,
                    reason: TextureError::Io(e),
                }),
            }
        }

        let mut batch = self.load_batch(generation, items).await?;
        batch.failures.extend(unreadable);
        Ok(batch)
    }
}

#[cfg(feature = "runtime-tokio")]
fn media_type_for_path(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}
