use hashbrown::HashMap;
use std::{
    path::Path,
    sync::mpsc::{channel, Receiver, Sender},
};

use anyhow::{anyhow, Result};
use glam::UVec2;
use io::{AssetReader, FileAssetReader};

use crate::{
    errors::Error,
    handle::{Handle, HandleId, WeakHandle},
    texture::{Texture, TextureProvider},
};

mod io;

/// Texture data kept by the store
#[derive(Debug)]
pub struct TextureEntry {
    pub name: String,
    pub size: UVec2,
    /// RGBA8 pixels, row-major, `size.x * size.y * 4` bytes
    pub pixels: Option<Vec<u8>>,
}

/// Loads textures and keeps their dimensions and pixels.
/// Entries live as long as some [`Handle`] to them is alive, call
/// [`TextureStore::collect_garbage`] to release dropped ones.
pub struct TextureStore {
    reader: Box<dyn AssetReader>,
    texture_id: u64,
    receiver: Receiver<HandleId>,
    sender: Sender<HandleId>,
    entries: HashMap<HandleId, TextureEntry>,
    names: HashMap<String, WeakHandle>,
}

impl TextureStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let (sender, receiver) = channel();
        Self {
            reader: Box::new(FileAssetReader::new(path)),
            texture_id: 0,
            sender,
            receiver,
            entries: Default::default(),
            names: Default::default(),
        }
    }

    fn alloc_handle(&mut self) -> Handle {
        let id = self.texture_id;
        self.texture_id += 1;
        Handle::new(id, self.sender.clone())
    }

    /// Register a texture that doesn't come from disk
    pub fn insert(&mut self, name: &str, size: UVec2, pixels: Option<Vec<u8>>) -> Texture {
        if let Some(pixels) = pixels.as_ref() {
            debug_assert_eq!(pixels.len(), (size.x * size.y * 4) as usize);
        }
        if self.get(name).is_some() {
            log::warn!("Replace texture {name}");
        }
        let handle = self.alloc_handle();
        self.entries.insert(
            handle.id(),
            TextureEntry {
                name: name.to_string(),
                size,
                pixels,
            },
        );
        self.names.insert(name.to_string(), handle.downgrade());
        Texture::new(handle, size)
    }

    /// Load an image relative to the store root, or return the already loaded one
    pub fn load_texture(&mut self, path: &str) -> Result<Texture> {
        if let Some(texture) = self.get(path) {
            return Ok(texture);
        }
        let bytes = self.reader.read(path)?;
        let im = match image::ImageFormat::from_path(path) {
            Ok(f) => image::load_from_memory_with_format(&bytes, f),
            _ => image::load_from_memory(&bytes),
        }
        .map_err(|err| anyhow!("decode texture {path}: {err}"))?;
        let im = im.into_rgba8();
        let size = UVec2::new(im.width(), im.height());
        log::debug!("Load texture {path} {}x{}", size.x, size.y);
        Ok(self.insert(path, size, Some(im.into_raw())))
    }

    /// Return a live texture by name
    pub fn get(&self, name: &str) -> Option<Texture> {
        let handle = self.names.get(name)?.upgrade()?;
        let entry = self.entries.get(&handle.id())?;
        Some(Texture::new(handle, entry.size))
    }

    pub fn entry(&self, handle: &Handle) -> Option<&TextureEntry> {
        self.entries.get(&handle.id())
    }

    pub fn size(&self, handle: &Handle) -> Option<UVec2> {
        self.entry(handle).map(|entry| entry.size)
    }

    /// RGBA of the pixel at (x, y), None if out of bounds or the texture has no pixels
    pub fn pixel(&self, handle: &Handle, x: u32, y: u32) -> Option<[u8; 4]> {
        let entry = self.entry(handle)?;
        if x >= entry.size.x || y >= entry.size.y {
            return None;
        }
        let pixels = entry.pixels.as_ref()?;
        let offset = ((y * entry.size.x + x) * 4) as usize;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// Remove textures whose handles are all dropped
    /// return removed count
    pub fn collect_garbage(&mut self) -> usize {
        let mut removed = 0;
        while let Ok(id) = self.receiver.try_recv() {
            let Some(entry) = self.entries.remove(&id) else {
                continue;
            };
            if self
                .names
                .get(&entry.name)
                .is_some_and(|named| named.id() == id)
            {
                self.names.remove(&entry.name);
            }
            log::debug!("Release texture {}", entry.name);
            removed += 1;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TextureProvider for TextureStore {
    fn texture(&mut self, name: &str) -> crate::errors::Result<Texture> {
        self.load_texture(name).map_err(|err| {
            log::error!("Failed to load texture {name}: {err:?}");
            Error::NoTexture(name.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    #[test]
    fn test_insert_and_pixel() {
        let mut store = TextureStore::new(env::temp_dir());
        let mut pixels = vec![0u8; 2 * 2 * 4];
        pixels[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let texture = store.insert("checker", UVec2::new(2, 2), Some(pixels));

        assert_eq!(store.size(&texture.handle), Some(UVec2::new(2, 2)));
        assert_eq!(store.pixel(&texture.handle, 1, 1), Some([1, 2, 3, 4]));
        assert_eq!(store.pixel(&texture.handle, 0, 0), Some([0, 0, 0, 0]));
        assert_eq!(store.pixel(&texture.handle, 2, 0), None);
        assert_eq!(store.get("checker"), Some(texture));
    }

    #[test]
    fn test_collect_garbage() {
        let mut store = TextureStore::new(env::temp_dir());
        let texture = store.insert("a", UVec2::new(4, 4), None);
        let kept = store.insert("b", UVec2::new(4, 4), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.collect_garbage(), 0);

        drop(texture);
        assert_eq!(store.collect_garbage(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_none());
        assert_eq!(store.get("b"), Some(kept));
    }

    #[test]
    fn test_load_png() {
        let dir = env::temp_dir().join("sprite_anim_store_test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut im = image::RgbaImage::new(8, 4);
        im.put_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        im.save(dir.join("hero.png")).unwrap();

        let mut store = TextureStore::new(&dir);
        let texture = store.texture("hero.png").unwrap();
        assert_eq!(texture.size, UVec2::new(8, 4));
        assert_eq!(store.pixel(&texture.handle, 3, 2), Some([10, 20, 30, 255]));

        // second load hits the cache
        let again = store.texture("hero.png").unwrap();
        assert_eq!(again.handle, texture.handle);
        assert_eq!(store.len(), 1);

        assert_eq!(
            store.texture("missing.png"),
            Err(Error::NoTexture("missing.png".to_string()))
        );
    }
}
