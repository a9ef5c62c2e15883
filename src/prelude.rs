pub use crate::animation::{
    DefinitionRef, PlaybackMode, SpriteAnimation, SpriteAnimationDefinition,
};
pub use crate::animation_set::{SpriteAnimationSet, SpriteAnimationSetDefinition};
pub use crate::asset::TextureStore;
pub use crate::camera::{Camera, CameraView};
pub use crate::config::LibraryConfig;
pub use crate::errors::Error;
pub use crate::handle::Handle;
pub use crate::isometric::{
    IsometricSpriteAnimationSet, IsometricSpriteAnimationSetDefinition, Quadrant,
};
pub use crate::library::SpriteLibrary;
pub use crate::sprite::Sprite;
pub use crate::sprite_sheet::SpriteSheet;
pub use crate::texture::{Texture, TextureProvider};
pub use crate::types::Rect;
pub use anyhow::{self, Result};
pub use glam::{self, UVec2, Vec2, Vec3};
