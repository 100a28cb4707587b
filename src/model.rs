//! Mesh/model collaborator seam
//!
//! The folding solver and the 3D scene live outside this crate. The pipeline
//! only consumes a face list and a material-refresh hook, both behind the
//! [`MeshModel`] trait so tests and alternative renderers can plug in.

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One polygonal face of the folded mesh, given as vertex indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshFace {
    pub vertices: Vec<u32>,
}

impl MeshFace {
    pub fn new(vertices: Vec<u32>) -> Self {
        Self { vertices }
    }
}

/// Face list imported from a crease pattern.
///
/// When attached to a pipeline it is preferred over the live mesh query.
#[derive(Debug, Clone, Default)]
pub struct FoldPattern {
    pub faces: Vec<MeshFace>,
}

impl FoldPattern {
    pub fn new(faces: Vec<MeshFace>) -> Self {
        Self { faces }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// How faces are shaded by the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Flat per-face color, texture mappings recorded but not drawn
    #[default]
    Color,
    /// Textured rendering through the packed atlas
    Texture,
}

/// External mesh/model collaborator
///
/// `request_material_refresh` is a pure notification: the pipeline calls it
/// after any visual-state change and consumes no return value.
pub trait MeshModel: Debug {
    /// Ordered face list of the live mesh
    fn faces(&self) -> Vec<MeshFace>;

    /// Ask the renderer to rebuild its material state
    fn request_material_refresh(&self);
}

/// In-memory model for tests
///
/// Counts refresh notifications so tests can assert on them.
#[derive(Debug, Clone, Default)]
pub struct MockModel {
    faces: Vec<MeshFace>,
    refreshes: Arc<AtomicUsize>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model with `count` triangular faces
    pub fn with_face_count(count: usize) -> Self {
        let faces = (0..count)
            .map(|i| {
                let base = (i * 3) as u32;
                MeshFace::new(vec![base, base + 1, base + 2])
            })
            .collect();
        Self {
            faces,
            refreshes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of material refreshes requested so far
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl MeshModel for MockModel {
    fn faces(&self) -> Vec<MeshFace> {
        self.faces.clone()
    }

    fn request_material_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}
