//! Texture atlas packing
//!
//! Merges the library into one GPU-bindable raster arranged as a uniform
//! grid of square cells, plus a per-texture region table aligned with
//! library order. Consumers recompute per-face UVs from
//! `layout.regions[map[face]]`; the packer never rewrites mesh UVs.
//!
//! Each texture is stretched into its cell regardless of native aspect
//! ratio. That distortion is intended product behavior.

use std::sync::Arc;

use glam::Vec2;
use image::imageops::FilterType;
use image::RgbaImage;
use log::warn;
use thiserror::Error;

use crate::texture::{LoadedTexture, SamplerSettings};

/// Default cap on the packed raster's larger side, in pixels
pub const DEFAULT_MAX_ATLAS_DIMENSION: u32 = 2048;

/// Errors raised during atlas construction
#[derive(Error, Debug)]
pub enum AtlasError {
    /// Too many textures for the dimension cap: cells would collapse to
    /// zero pixels.
    #[error("atlas cell size is zero ({count} textures under a {max}px cap)")]
    CellTooSmall { count: usize, max: u32 },

    /// One texture could not be drawn into its cell. Tolerated per cell;
    /// packing continues with the cell left blank.
    #[error("texture {index} ('{name}') could not be drawn: {reason}")]
    DrawFailed {
        index: usize,
        name: String,
        reason: String,
    },
}

/// Pixel rectangle of one texture inside the packed raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Grid shape and region table of a packed atlas.
///
/// `regions` is aligned 1:1 with the library order at pack time. A layout
/// built before a library mutation is stale and must be repacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasLayout {
    pub rows: u32,
    pub cols: u32,
    /// Uniform cell side length in pixels
    pub cell: u32,
    /// Overall raster width in pixels
    pub width: u32,
    /// Overall raster height in pixels
    pub height: u32,
    pub regions: Vec<UvRegion>,
}

impl AtlasLayout {
    /// Normalized `(uv_min, uv_max)` of the region for library index `index`
    pub fn region_uvs(&self, index: usize) -> Option<(Vec2, Vec2)> {
        let region = self.regions.get(index)?;
        let w = self.width as f32;
        let h = self.height as f32;
        Some((
            Vec2::new(region.x as f32 / w, region.y as f32 / h),
            Vec2::new(
                (region.x + region.width) as f32 / w,
                (region.y + region.height) as f32 / h,
            ),
        ))
    }
}

/// One renderable resource covering the whole library
#[derive(Debug, Clone)]
pub enum Atlas {
    /// Identity passthrough: a single-texture library is its own atlas,
    /// no packing performed and no regions computed
    Single(LoadedTexture),
    /// Packed grid raster plus its region table, pending one GPU upload
    Packed {
        image: Arc<RgbaImage>,
        layout: AtlasLayout,
        sampler: SamplerSettings,
        needs_upload: bool,
    },
}

impl Atlas {
    /// Pixel data of the renderable resource
    pub fn image(&self) -> &Arc<RgbaImage> {
        match self {
            Self::Single(tex) => &tex.image,
            Self::Packed { image, .. } => image,
        }
    }

    /// Region table, present only for a packed grid
    pub fn layout(&self) -> Option<&AtlasLayout> {
        match self {
            Self::Single(_) => None,
            Self::Packed { layout, .. } => Some(layout),
        }
    }
}

/// Packs the texture library into a single raster
#[derive(Debug, Clone, Copy)]
pub struct AtlasPacker {
    max_dimension: u32,
}

impl Default for AtlasPacker {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_ATLAS_DIMENSION,
        }
    }
}

impl AtlasPacker {
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Pack `library` into one atlas.
    ///
    /// An empty library has no atlas; a single texture passes through
    /// unchanged; anything larger becomes a `ceil(sqrt(T))`-column grid of
    /// uniform square cells. A per-texture draw failure leaves that cell
    /// blank without aborting the rest; if nothing draws, the first library
    /// texture is returned unpacked.
    pub fn pack(&self, library: &[LoadedTexture]) -> Result<Option<Atlas>, AtlasError> {
        match library.len() {
            0 => Ok(None),
            1 => Ok(Some(Atlas::Single(library[0].clone()))),
            count => self.pack_grid(library, count).map(Some),
        }
    }

    fn pack_grid(&self, library: &[LoadedTexture], count: usize) -> Result<Atlas, AtlasError> {
        let cols = (count as f64).sqrt().ceil() as u32;
        let rows = (count as u32).div_ceil(cols);
        let cell = self.max_dimension / rows.max(cols);
        if cell == 0 {
            return Err(AtlasError::CellTooSmall {
                count,
                max: self.max_dimension,
            });
        }

        let width = cols * cell;
        let height = rows * cell;
        let mut canvas = RgbaImage::new(width, height);

        let mut regions = Vec::with_capacity(count);
        let mut drawn = 0usize;
        for (index, tex) in library.iter().enumerate() {
            let col = index as u32 % cols;
            let row = index as u32 / cols;
            let region = UvRegion {
                x: col * cell,
                y: row * cell,
                width: cell,
                height: cell,
            };

            match draw_cell(&mut canvas, tex, index, &region) {
                Ok(()) => drawn += 1,
                Err(e) => warn!("leaving atlas cell {index} blank: {e}"),
            }
            regions.push(region);
        }

        if drawn == 0 {
            warn!("no atlas cell could be drawn, falling back to the first library texture");
            return Ok(Atlas::Single(library[0].clone()));
        }

        Ok(Atlas::Packed {
            image: Arc::new(canvas),
            layout: AtlasLayout {
                rows,
                cols,
                cell,
                width,
                height,
                regions,
            },
            sampler: SamplerSettings::default(),
            needs_upload: true,
        })
    }
}

/// Stretch one texture into its square cell
fn draw_cell(
    canvas: &mut RgbaImage,
    tex: &LoadedTexture,
    index: usize,
    region: &UvRegion,
) -> Result<(), AtlasError> {
    if tex.width() == 0 || tex.height() == 0 {
        return Err(AtlasError::DrawFailed {
            index,
            name: tex.name.clone(),
            reason: "empty raster".to_string(),
        });
    }

    let tile = image::imageops::resize(
        tex.image.as_ref(),
        region.width,
        region.height,
        FilterType::Lanczos3,
    );
    image::imageops::overlay(canvas, &tile, region.x as i64, region.y as i64);
    Ok(())
}
