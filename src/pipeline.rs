//! Pipeline context object
//!
//! Owns the library, face mapping, render mode, batch-generation counter
//! and the cached atlas for one independent ingestion pipeline. Generic
//! over the external mesh collaborator, so tests run against [`MockModel`]
//! and multiple pipelines never share state.
//!
//! All mutation happens through `&mut self` on the host's single logical
//! thread; a batch is one aggregate future whose result is installed here,
//! where a stale generation token is detected and discarded.

use log::{debug, warn};
use rand::Rng;

use crate::assign::{balanced_assignment, FaceTextureMap};
use crate::atlas::{Atlas, AtlasPacker};
use crate::library::{TextureEntry, TextureLibrary};
use crate::loader::LoadedBatch;
use crate::model::{FoldPattern, MeshModel, RenderMode};
use crate::texture::LoadedTexture;

/// Outcome of handing a finished batch to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchInstall {
    /// The batch replaced the library and cleared the face mapping
    Installed,
    /// A newer batch was started in the meantime; this result was discarded
    Superseded,
}

/// One independent texture-ingestion pipeline
#[derive(Debug)]
pub struct TexturePipeline<M: MeshModel> {
    model: M,
    pattern: Option<FoldPattern>,
    library: TextureLibrary,
    face_map: FaceTextureMap,
    mode: RenderMode,
    packer: AtlasPacker,
    /// Lazily rebuilt; any library mutation drops it
    atlas: Option<Atlas>,
    /// Latest issued batch-generation token
    generation: u64,
}

impl<M: MeshModel> TexturePipeline<M> {
    pub fn new(model: M) -> Self {
        Self::with_packer(model, AtlasPacker::default())
    }

    pub fn with_packer(model: M, packer: AtlasPacker) -> Self {
        Self {
            model,
            pattern: None,
            library: TextureLibrary::new(),
            face_map: FaceTextureMap::new(),
            mode: RenderMode::default(),
            packer,
            atlas: None,
            generation: 0,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn library(&self) -> &TextureLibrary {
        &self.library
    }

    pub fn face_map(&self) -> &FaceTextureMap {
        &self.face_map
    }

    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    /// Prefer this imported face list over the model's live face query
    pub fn attach_pattern(&mut self, pattern: FoldPattern) {
        self.pattern = Some(pattern);
    }

    pub fn detach_pattern(&mut self) -> Option<FoldPattern> {
        self.pattern.take()
    }

    /// Switch shading mode. Entering texture mode fires the deferred
    /// visual update for any mappings recorded while in color mode.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if self.mode != mode {
            self.mode = mode;
            self.model.request_material_refresh();
        }
    }

    /// Issue the token for a new load batch, superseding any batch still
    /// in flight
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Install a finished batch: replace the library, clear the face
    /// mapping, drop the cached atlas.
    ///
    /// Last writer wins: a batch carrying anything but the latest issued
    /// generation token is silently discarded.
    pub fn install_batch(&mut self, batch: LoadedBatch) -> BatchInstall {
        if batch.generation != self.generation {
            debug!(
                "discarding superseded batch {} (latest is {})",
                batch.generation, self.generation
            );
            return BatchInstall::Superseded;
        }

        self.library.replace(batch.textures);
        self.face_map.clear();
        self.atlas = None;
        self.model.request_material_refresh();
        BatchInstall::Installed
    }

    /// Select a texture for editing/preview. Invalid indices are a no-op.
    pub fn select(&mut self, index: usize) {
        if self.library.select(index) {
            self.model.request_material_refresh();
        }
    }

    /// Remove the texture at `index`, renumbering the face mapping and
    /// clamping the selection
    pub fn remove(&mut self, index: usize) -> Option<LoadedTexture> {
        let removed = self.library.remove(index, &mut self.face_map)?;
        self.atlas = None;
        self.model.request_material_refresh();
        Some(removed)
    }

    /// Selected texture, else the first, else none
    pub fn active_texture(&self) -> Option<&LoadedTexture> {
        self.library.active()
    }

    /// `(index, name)` listing for the UI layer
    pub fn entries(&self) -> Vec<TextureEntry> {
        self.library.entries()
    }

    /// Map one face to one library texture.
    ///
    /// In texture mode this also drops the cached atlas and requests a
    /// material refresh; in color mode the mapping is recorded silently.
    /// Returns whether the mapping was written.
    pub fn assign_face(&mut self, face: u32, texture: usize) -> bool {
        if texture >= self.library.len() {
            warn!(
                "face {face}: texture index {texture} out of bounds (library length {})",
                self.library.len()
            );
            return false;
        }

        self.face_map.assign(face, texture);
        if self.mode == RenderMode::Texture {
            self.atlas = None;
            self.model.request_material_refresh();
        }
        true
    }

    /// Randomized balanced assignment over every face, driven by `rng`.
    ///
    /// Uses the attached fold pattern when present, the model's face list
    /// otherwise. Returns the number of faces assigned; 0 with a warning
    /// when the library is empty or no face source yields faces.
    pub fn auto_assign_with<R: Rng>(&mut self, rng: &mut R) -> usize {
        if self.library.is_empty() {
            warn!("auto-assign skipped: texture library is empty");
            return 0;
        }

        let face_count = match &self.pattern {
            Some(pattern) => pattern.face_count(),
            None => self.model.faces().len(),
        };
        if face_count == 0 {
            warn!("auto-assign skipped: no face source available");
            return 0;
        }

        let work = balanced_assignment(face_count, self.library.len(), rng);
        for (face, &texture) in work.iter().enumerate() {
            self.face_map.assign(face as u32, texture);
        }

        if self.mode == RenderMode::Texture {
            self.atlas = None;
            self.model.request_material_refresh();
        }
        face_count
    }

    /// [`auto_assign_with`](Self::auto_assign_with) seeded from the thread RNG
    pub fn auto_assign(&mut self) -> usize {
        self.auto_assign_with(&mut rand::thread_rng())
    }

    /// Current atlas, rebuilding lazily after any library mutation.
    ///
    /// `None` while the library is empty.
    pub fn atlas(&mut self) -> crate::Result<Option<&Atlas>> {
        if self.atlas.is_none() {
            self.atlas = self.packer.pack(self.library.textures())?;
            if self.atlas.is_some() {
                self.model.request_material_refresh();
            }
        }
        Ok(self.atlas.as_ref())
    }
}
