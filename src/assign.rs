//! Face-to-texture assignment
//!
//! Holds the sparse face → library-index mapping and the randomized
//! balanced auto-assignment algorithm.

use std::collections::HashMap;

use rand::Rng;

/// Sparse mapping from face index to library index.
///
/// An absent entry means the face renders with the default material.
#[derive(Debug, Clone, Default)]
pub struct FaceTextureMap {
    entries: HashMap<u32, usize>,
}

impl FaceTextureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library index assigned to `face`, if any
    pub fn get(&self, face: u32) -> Option<usize> {
        self.entries.get(&face).copied()
    }

    /// Record an explicit mapping, overwriting any previous entry
    pub fn assign(&mut self, face: u32, texture: usize) {
        self.entries.insert(face, texture);
    }

    /// Drop every mapping
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.entries.iter().map(|(&face, &tex)| (face, tex))
    }

    /// Repair the mapping after library slot `removed` was deleted.
    ///
    /// Entries pointing at the removed slot are dropped; entries pointing
    /// past it shift down by one; earlier entries are untouched.
    pub fn remap_after_removal(&mut self, removed: usize) {
        self.entries.retain(|_, tex| *tex != removed);
        for tex in self.entries.values_mut() {
            if *tex > removed {
                *tex -= 1;
            }
        }
    }
}

/// Build a balanced random face assignment for `face_count` faces over
/// `texture_count` textures.
///
/// Each texture index appears `floor(F/T)` or `ceil(F/T)` times: the work
/// sequence is filled blockwise with a per-texture quota of `ceil(F/T)`
/// entries, truncated at `face_count`, then permuted with an in-place
/// Fisher–Yates shuffle. The shuffle changes the arrangement but never the
/// multiset of occurrences.
pub fn balanced_assignment<R: Rng>(
    face_count: usize,
    texture_count: usize,
    rng: &mut R,
) -> Vec<usize> {
    if face_count == 0 || texture_count == 0 {
        return Vec::new();
    }

    let quota = face_count.div_ceil(texture_count);
    let mut work = Vec::with_capacity(face_count);
    'fill: for texture in 0..texture_count {
        for _ in 0..quota {
            if work.len() == face_count {
                break 'fill;
            }
            work.push(texture);
        }
    }

    for i in (1..work.len()).rev() {
        let j = rng.gen_range(0..=i);
        work.swap(i, j);
    }

    work
}
