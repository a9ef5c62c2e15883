use core::fmt;
use std::fmt::Debug;

use glam::Vec2;

use crate::{handle::Handle, texture::Texture, types::Rect};

/// Sprite
/// A region of a texture with its own pivot and world scale
#[derive(Clone, PartialEq)]
pub struct Sprite {
    /// texture
    pub texture: Texture,
    /// normalized texture coordinates
    pub uvs: Rect,
    /// texels per world unit
    pub pixels_per_unit: f32,
    /// Pivot in normalized sprite space, (0.5, 0.5) is the center
    pub pivot: Vec2,
    /// Flip Horizontal
    pub flip_x: bool,
    /// Flip Vertical
    pub flip_y: bool,
}

impl Sprite {
    pub fn new(texture: Texture, uvs: Rect, pixels_per_unit: f32) -> Self {
        debug_assert!(pixels_per_unit > 0.0);
        Self {
            texture,
            uvs,
            pixels_per_unit,
            pivot: Vec2::splat(0.5),
            flip_x: false,
            flip_y: false,
        }
    }

    /// Build sprite covering the whole texture
    pub fn from_texture(texture: Texture, pixels_per_unit: f32) -> Self {
        Self::new(texture, Rect::UNIT, pixels_per_unit)
    }

    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    pub fn handle(&self) -> &Handle {
        &self.texture.handle
    }

    /// Texture coordinates with flips applied, ready for the renderer
    pub fn tex_coords(&self) -> Rect {
        let mut uvs = self.uvs;
        if self.flip_x {
            uvs = uvs.flip_x();
        }
        if self.flip_y {
            uvs = uvs.flip_y();
        }
        uvs
    }
}

impl Debug for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.pixel_size();
        f.debug_struct("Sprite")
            .field("uvs", &self.uvs)
            .field("size", &size)
            .finish()
    }
}

impl Sprite {
    /// Return sprite size in texels
    pub fn pixel_size(&self) -> Vec2 {
        self.uvs.size() * self.texture.sizef()
    }

    /// Return sprite size in world units
    pub fn dimensions(&self) -> Vec2 {
        self.pixel_size() / self.pixels_per_unit
    }

    /// Bounds in world units, relative to the pivot
    pub fn local_bounds(&self) -> Rect {
        let dimensions = self.dimensions();
        Rect {
            min: -self.pivot * dimensions,
            max: (Vec2::ONE - self.pivot) * dimensions,
        }
    }
}
