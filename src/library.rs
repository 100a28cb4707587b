//! Indexed texture library
//!
//! Ordered collection of decoded textures. The position in the sequence is
//! the stable identity every other component uses: the face map stores it,
//! atlas regions align with it, and removal renumbers it in lockstep.

use crate::assign::FaceTextureMap;
use crate::texture::LoadedTexture;

/// Read-only row for UI listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    pub index: usize,
    pub name: String,
}

/// Ordered, indexable collection of loaded textures with a selection cursor
#[derive(Debug, Default)]
pub struct TextureLibrary {
    textures: Vec<LoadedTexture>,
    selected: Option<usize>,
}

impl TextureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LoadedTexture> {
        self.textures.get(index)
    }

    pub fn textures(&self) -> &[LoadedTexture] {
        &self.textures
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadedTexture> {
        self.textures.iter()
    }

    /// Currently selected index, if any
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Set the selection. Out-of-range indices and empty libraries are a
    /// no-op. Returns whether the selection changed.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.textures.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Selected texture, falling back to the first entry when no explicit
    /// selection is set
    pub fn active(&self) -> Option<&LoadedTexture> {
        match self.selected {
            Some(index) => self.textures.get(index),
            None => self.textures.first(),
        }
    }

    /// Delete the slot at `index`, renumbering `map` to match and clamping
    /// the selection into the new bounds.
    ///
    /// Returns the removed texture, or `None` when the index was invalid.
    pub fn remove(
        &mut self,
        index: usize,
        map: &mut FaceTextureMap,
    ) -> Option<LoadedTexture> {
        if index >= self.textures.len() {
            return None;
        }

        let removed = self.textures.remove(index);
        map.remap_after_removal(index);

        self.selected = if self.textures.is_empty() {
            None
        } else {
            // Same index preferred, clamped to the last slot.
            Some(self.selected.unwrap_or(0).min(self.textures.len() - 1))
        };

        Some(removed)
    }

    /// Replace the whole collection with a fresh batch.
    ///
    /// Selection resets to the first texture, or to none for an empty batch.
    pub fn replace(&mut self, textures: Vec<LoadedTexture>) {
        self.textures = textures;
        self.selected = if self.textures.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// `(index, name)` snapshot for display
    pub fn entries(&self) -> Vec<TextureEntry> {
        self.textures
            .iter()
            .enumerate()
            .map(|(index, tex)| TextureEntry {
                index,
                name: tex.name.clone(),
            })
            .collect()
    }
}
