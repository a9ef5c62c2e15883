use core::fmt;
use std::fmt::Debug;

use glam::{UVec2, Vec2};

use crate::{errors::Result, handle::Handle};

/// Texture
/// Use TextureStore#load_texture or TextureStore#insert to get a texture
#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    /// handle
    pub handle: Handle,
    /// size in pixels
    pub size: UVec2,
}

impl Texture {
    pub fn new(handle: Handle, size: UVec2) -> Self {
        Self { handle, size }
    }

    /// Return texture size
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Return texture size in Vec2
    pub fn sizef(&self) -> Vec2 {
        Vec2::new(self.size.x as f32, self.size.y as f32)
    }
}

impl Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.handle.id())
            .field("size", &self.size)
            .finish()
    }
}

/// Resolves texture names used by configuration into textures
pub trait TextureProvider {
    fn texture(&mut self, name: &str) -> Result<Texture>;
}
