use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub trait AssetReader: Send + Sync + 'static {
    fn get_full_path(&self, path: &str) -> PathBuf;
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Adapted from bevy <https://github.com/bevyengine/bevy/blob/99ab0285e459753838d0e0716fda9be7b4976a4c/crates/bevy_asset/src/io/file/mod.rs#L18>
fn get_base_path() -> PathBuf {
    if let Ok(asset_root) = env::var("SPRITE_ANIM_ASSET_ROOT") {
        PathBuf::from(asset_root)
    } else if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(manifest_dir)
    } else {
        env::current_exe()
            .ok()
            .and_then(|path| path.parent().map(ToOwned::to_owned))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub(crate) struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_absolute() {
            path.to_owned()
        } else {
            get_base_path().join(path)
        };
        Self { root_path }
    }
}

impl AssetReader for FileAssetReader {
    fn get_full_path(&self, path: &str) -> PathBuf {
        self.root_path.join(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.get_full_path(path);
        fs::read(&full_path).with_context(|| format!("read asset {}", full_path.display()))
    }
}
