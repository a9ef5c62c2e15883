use glam::{UVec2, Vec2};

use crate::{
    errors::{Error, Result},
    handle::Handle,
    sprite::Sprite,
    texture::Texture,
    types::Rect,
};

/// A fixed grid of equally sized sprites over one texture.
/// Sprite indices are row-major: index `i` is cell `(i % width, i / width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    texture: Texture,
    layout: UVec2,
    pixels_per_unit: f32,
}

impl SpriteSheet {
    /// `layout` is the number of tiles wide and high, both must be at least 1
    pub fn new(texture: Texture, layout: UVec2) -> Result<Self> {
        if layout.x == 0 || layout.y == 0 {
            return Err(Error::InvalidLayout(layout.x, layout.y));
        }
        Ok(Self {
            texture,
            layout,
            pixels_per_unit: 1.0,
        })
    }

    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Result<Self> {
        self.pixels_per_unit = check_pixels_per_unit(pixels_per_unit)?;
        Ok(self)
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn handle(&self) -> &Handle {
        &self.texture.handle
    }

    pub fn layout(&self) -> UVec2 {
        self.layout
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    pub fn num_sprites(&self) -> u32 {
        self.layout.x * self.layout.y
    }

    /// Size of one cell in texels
    pub fn sprite_pixel_size(&self) -> Vec2 {
        self.texture.sizef() / self.layout.as_vec2()
    }

    pub fn index_for_coordinates(&self, coords: UVec2) -> u32 {
        coords.y * self.layout.x + coords.x
    }

    pub fn tex_coords_for_coordinates(&self, coords: UVec2) -> Rect {
        debug_assert!(coords.x < self.layout.x && coords.y < self.layout.y);
        let layout = self.layout.as_vec2();
        let min = coords.as_vec2() / layout;
        let max = (coords + UVec2::ONE).as_vec2() / layout;
        Rect { min, max }
    }

    pub fn tex_coords_for_index(&self, index: u32) -> Rect {
        debug_assert!(
            index < self.num_sprites(),
            "sprite index {index} out of {}",
            self.num_sprites()
        );
        let coords = UVec2::new(index % self.layout.x, index / self.layout.x);
        self.tex_coords_for_coordinates(coords)
    }

    /// Err unless `index` names a cell of this sheet
    pub fn check_index(&self, index: u32) -> Result<u32> {
        if index < self.num_sprites() {
            Ok(index)
        } else {
            Err(Error::InvalidSpriteIndex(index, self.num_sprites()))
        }
    }

    /// Checked [`SpriteSheet::sprite`]
    pub fn try_sprite(&self, index: u32) -> Result<Sprite> {
        self.check_index(index).map(|index| self.sprite(index))
    }

    /// Build a sprite covering one cell
    pub fn sprite(&self, index: u32) -> Sprite {
        Sprite::new(
            self.texture.clone(),
            self.tex_coords_for_index(index),
            self.pixels_per_unit,
        )
    }
}

pub(crate) fn check_pixels_per_unit(pixels_per_unit: f32) -> Result<f32> {
    if pixels_per_unit > 0.0 && pixels_per_unit.is_finite() {
        Ok(pixels_per_unit)
    } else {
        Err(Error::InvalidPixelsPerUnit(pixels_per_unit))
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::asset::TextureStore;

    fn sheet(store: &mut TextureStore, layout: UVec2) -> SpriteSheet {
        let texture = store.insert("sheet", UVec2::new(64, 32), None);
        SpriteSheet::new(texture, layout).unwrap()
    }

    #[test]
    fn test_index_matches_coordinates() {
        let mut store = TextureStore::new(env::temp_dir());
        let sheet = sheet(&mut store, UVec2::new(4, 2));
        assert_eq!(sheet.num_sprites(), 8);
        for i in 0..sheet.num_sprites() {
            let coords = UVec2::new(i % 4, i / 4);
            assert_eq!(
                sheet.tex_coords_for_index(i),
                sheet.tex_coords_for_coordinates(coords)
            );
            assert_eq!(sheet.index_for_coordinates(coords), i);
        }
    }

    #[test]
    fn test_row_is_contiguous() {
        let mut store = TextureStore::new(env::temp_dir());
        let sheet = sheet(&mut store, UVec2::new(4, 2));
        for i in 0..sheet.num_sprites() - 1 {
            if (i + 1) % 4 == 0 {
                continue;
            }
            let a = sheet.tex_coords_for_index(i);
            let b = sheet.tex_coords_for_index(i + 1);
            assert_eq!(a.max.x, b.min.x);
            assert_eq!(a.min.y, b.min.y);
        }
    }

    #[test]
    fn test_tex_coords() {
        let mut store = TextureStore::new(env::temp_dir());
        let sheet = sheet(&mut store, UVec2::new(4, 2));
        assert_eq!(
            sheet.tex_coords_for_index(5),
            Rect::new(Vec2::new(0.25, 0.5), Vec2::new(0.5, 1.0))
        );
        assert_eq!(sheet.sprite_pixel_size(), Vec2::new(16.0, 16.0));
        assert_eq!(
            sheet.tex_coords_for_coordinates(UVec2::new(3, 1)).max,
            Vec2::ONE
        );
    }

    #[test]
    fn test_invalid_layout() {
        let mut store = TextureStore::new(env::temp_dir());
        let texture = store.insert("sheet", UVec2::new(64, 32), None);
        assert_eq!(
            SpriteSheet::new(texture, UVec2::new(0, 2)),
            Err(Error::InvalidLayout(0, 2))
        );
    }

    #[test]
    fn test_checked_access() {
        let mut store = TextureStore::new(env::temp_dir());
        let sheet = sheet(&mut store, UVec2::new(4, 4));
        assert_eq!(sheet.check_index(15), Ok(15));
        assert_eq!(sheet.check_index(99), Err(Error::InvalidSpriteIndex(99, 16)));
        assert!(sheet.try_sprite(16).is_err());
        assert_eq!(sheet.try_sprite(5).unwrap().uvs, sheet.tex_coords_for_index(5));

        assert_eq!(
            sheet.clone().with_pixels_per_unit(0.0),
            Err(Error::InvalidPixelsPerUnit(0.0))
        );
        assert!(sheet.clone().with_pixels_per_unit(f32::INFINITY).is_err());
        let sheet = sheet.with_pixels_per_unit(16.0).unwrap();
        assert_eq!(sheet.sprite(0).dimensions(), Vec2::new(1.0, 0.5));
    }
}
