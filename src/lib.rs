//! foldtex - texture ingestion and atlas pipeline for folded-mesh renderers
//!
//! Takes user-selected raster images and maps them onto the faces of a
//! folded polyhedral mesh for real-time rendering:
//! size-budgeted compression, fault-tolerant batch decoding, a stable
//! indexed texture library, randomized balanced face assignment, and a
//! grid atlas packer producing one GPU-bindable raster with per-texture
//! UV regions.
//!
//! # Quick Start
//!
//! ```ignore
//! use foldtex::{MockModel, SourceImage, TextureLoader, TexturePipeline};
//!
//! let mut pipeline = TexturePipeline::new(MockModel::with_face_count(12));
//! let loader = TextureLoader::default();
//!
//! let generation = pipeline.next_generation();
//! let batch = loader.load_batch(generation, images).await?;
//! pipeline.install_batch(batch);
//! pipeline.auto_assign();
//! let atlas = pipeline.atlas()?;
//! ```
//!
//! # Feature Flags
//!
//! - `runtime-tokio`: async file reads for the path-based batch loader

// Core modules
pub mod assign;
pub mod atlas;
pub mod compress;
pub mod library;
pub mod loader;
pub mod pipeline;

// Support modules
pub mod model;
pub mod progress;
pub mod texture;

// Error types
mod error;
pub use error::{EngineError, Result};

// Re-export assignment types
pub use assign::{balanced_assignment, FaceTextureMap};

// Re-export atlas types
pub use atlas::{Atlas, AtlasError, AtlasLayout, AtlasPacker, UvRegion};

// Re-export compressor types
pub use compress::{CompressorConfig, SizeBudgetCompressor};

// Re-export library types
pub use library::{TextureEntry, TextureLibrary};

// Re-export loader types
pub use loader::{LoadFailure, LoadedBatch, TextureLoader};

// Re-export model/collaborator types
pub use model::{FoldPattern, MeshFace, MeshModel, MockModel, RenderMode};

// Re-export pipeline types
pub use pipeline::{BatchInstall, TexturePipeline};

// Re-export progress types
pub use progress::{BatchPhase, BatchProgress};

// Re-export texture types
pub use texture::{
    FilterMode, LoadedTexture, SamplerSettings, SourceImage, TextureError, WrapMode,
};

// Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
