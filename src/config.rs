use std::sync::Arc;

use glam::{UVec2, Vec2};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    animation::{PlaybackMode, SpriteAnimationDefinition},
    animation_set::SpriteAnimationSetDefinition,
    errors::{Error, Result},
    sprite::Sprite,
    sprite_sheet::{check_pixels_per_unit, SpriteSheet},
    texture::TextureProvider,
};

pub const DEFAULT_FPS: f32 = 10.0;

fn default_pixels_per_unit() -> f32 {
    1.0
}

fn default_playback_mode() -> u32 {
    PlaybackMode::Looping.into()
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryConfig {
    #[serde(default)]
    pub sprite_sheets: Vec<SpriteSheetConfig>,
    #[serde(default)]
    pub sprites: Vec<SpriteConfig>,
    #[serde(default)]
    pub animation_sets: Vec<SpriteAnimationSetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSheetConfig {
    pub name: String,
    pub texture: String,
    /// tiles wide, tiles high
    pub layout: (u32, u32),
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteConfig {
    pub name: String,
    /// Whole texture sprite
    pub texture: Option<String>,
    /// One cell of a sheet, takes precedence over `texture`
    pub sprite_sheet: Option<String>,
    #[serde(default)]
    pub index: u32,
    pub pixels_per_unit: Option<f32>,
    pub pivot: Option<(f32, f32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteAnimationConfig {
    pub name: String,
    pub sprite_indices: Vec<u32>,
    pub fps: Option<f32>,
    /// 0 play to end, 1 looping, 2 ping-pong
    #[serde(default = "default_playback_mode")]
    pub playback_mode: u32,
    /// degrees
    #[serde(default)]
    pub orientation_offset: f32,
    pub sprite_sheet: Option<String>,
    pub sprite_layout: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteAnimationSetConfig {
    pub name: String,
    pub default_animation: String,
    pub fps: Option<f32>,
    pub sprite_sheet: Option<String>,
    pub sprite_layout: Option<(u32, u32)>,
    #[serde(default)]
    pub isometric: bool,
    pub animations: Vec<SpriteAnimationConfig>,
}

/// What configuration entries are resolved against
pub struct ConfigContext<'a> {
    pub textures: &'a mut dyn TextureProvider,
    pub sheets: &'a HashMap<String, Arc<SpriteSheet>>,
}

impl<'a> ConfigContext<'a> {
    pub fn new(
        textures: &'a mut dyn TextureProvider,
        sheets: &'a HashMap<String, Arc<SpriteSheet>>,
    ) -> Self {
        Self { textures, sheets }
    }

    /// `name` is a declared sheet when no layout is given, otherwise a texture
    /// cut into `layout`
    pub fn sheet(&mut self, name: &str, layout: Option<(u32, u32)>) -> Result<Arc<SpriteSheet>> {
        match layout {
            None => self
                .sheets
                .get(name)
                .cloned()
                .ok_or_else(|| Error::MissingSpriteLayout(name.to_string())),
            Some(layout) => {
                let texture = self.textures.texture(name)?;
                Ok(Arc::new(SpriteSheet::new(texture, UVec2::from(layout))?))
            }
        }
    }
}

impl SpriteSheetConfig {
    pub fn build(&self, textures: &mut dyn TextureProvider) -> Result<SpriteSheet> {
        let texture = textures.texture(&self.texture)?;
        SpriteSheet::new(texture, UVec2::from(self.layout))?
            .with_pixels_per_unit(self.pixels_per_unit)
    }
}

impl SpriteConfig {
    pub fn build(&self, ctx: &mut ConfigContext) -> Result<Sprite> {
        let mut sprite = if let Some(sheet_name) = self.sprite_sheet.as_deref() {
            let sheet = ctx
                .sheets
                .get(sheet_name)
                .ok_or_else(|| Error::NoSpriteSheet(sheet_name.to_string()))?;
            sheet.try_sprite(self.index)?
        } else if let Some(texture) = self.texture.as_deref() {
            Sprite::from_texture(ctx.textures.texture(texture)?, default_pixels_per_unit())
        } else {
            return Err(Error::MissingSpriteSheet(self.name.clone()));
        };
        if let Some(pixels_per_unit) = self.pixels_per_unit {
            sprite.pixels_per_unit = check_pixels_per_unit(pixels_per_unit)?;
        }
        if let Some((x, y)) = self.pivot {
            sprite.pivot = Vec2::new(x, y);
        }
        Ok(sprite)
    }
}

impl SpriteAnimationConfig {
    /// `group_sheet` applies when the entry names no sheet of its own
    pub fn build(
        &self,
        ctx: &mut ConfigContext,
        group_sheet: Option<&Arc<SpriteSheet>>,
        group_layout: Option<(u32, u32)>,
        default_fps: f32,
    ) -> Result<SpriteAnimationDefinition> {
        let mode = PlaybackMode::try_from(self.playback_mode)?;
        let sheet = match (self.sprite_sheet.as_deref(), self.sprite_layout) {
            (Some(name), Some(layout)) => ctx.sheet(name, Some(layout))?,
            (Some(name), None) => {
                let declared = ctx.sheets.get(name).cloned();
                match declared {
                    Some(sheet) => sheet,
                    None => ctx.sheet(name, group_layout)?,
                }
            }
            // same texture, different grid
            (None, Some(layout)) => {
                let group_sheet = group_sheet
                    .ok_or_else(|| Error::MissingSpriteSheet(self.name.clone()))?;
                Arc::new(SpriteSheet::new(
                    group_sheet.texture().clone(),
                    UVec2::from(layout),
                )?)
            }
            (None, None) => group_sheet
                .cloned()
                .ok_or_else(|| Error::MissingSpriteSheet(self.name.clone()))?,
        };
        let fps = self.fps.unwrap_or(default_fps);
        let def =
            SpriteAnimationDefinition::from_fps(sheet, self.sprite_indices.clone(), fps, mode)?
                .with_name(self.name.clone())
                .with_orientation_offset(self.orientation_offset);
        Ok(def)
    }
}

impl SpriteAnimationSetConfig {
    pub fn build(&self, ctx: &mut ConfigContext) -> Result<SpriteAnimationSetDefinition> {
        let group_sheet = match self.sprite_sheet.as_deref() {
            Some(name) => Some(ctx.sheet(name, self.sprite_layout)?),
            None => None,
        };
        let default_fps = self.fps.unwrap_or(DEFAULT_FPS);
        let mut animations = Vec::with_capacity(self.animations.len());
        for anim in &self.animations {
            let def = anim.build(ctx, group_sheet.as_ref(), self.sprite_layout, default_fps)?;
            animations.push((anim.name.clone(), def));
        }
        SpriteAnimationSetDefinition::new(self.default_animation.clone(), animations)
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;
    use crate::{asset::TextureStore, texture::Texture, types::Rect};

    const SET: &str = r#"{
        "name": "knight",
        "defaultAnimation": "Idle",
        "fps": 8,
        "spriteSheet": "knight.png",
        "spriteLayout": [4, 4],
        "animations": [
            { "name": "Idle", "spriteIndices": [0, 1, 2, 3] },
            { "name": "Attack", "spriteIndices": [4, 5, 6], "fps": 10, "playbackMode": 0 },
            { "name": "Wave", "spriteIndices": [0, 1], "spriteLayout": [2, 1], "playbackMode": 2 },
            { "name": "Cast", "spriteIndices": [1], "spriteSheet": "fx", "orientationOffset": 45 }
        ]
    }"#;

    fn store() -> (TextureStore, Vec<Texture>) {
        let mut store = TextureStore::new(env::temp_dir());
        let textures = vec![
            store.insert("knight.png", UVec2::new(64, 64), None),
            store.insert("fx.png", UVec2::new(32, 16), None),
        ];
        (store, textures)
    }

    #[test]
    fn test_build_set() {
        let (mut store, textures) = store();
        let fx = textures[1].clone();
        let mut sheets = HashMap::new();
        sheets.insert(
            "fx".to_string(),
            Arc::new(SpriteSheet::new(fx, UVec2::new(2, 1)).unwrap()),
        );
        let config: SpriteAnimationSetConfig = serde_json::from_str(SET).unwrap();
        let mut ctx = ConfigContext::new(&mut store, &sheets);
        let set = config.build(&mut ctx).unwrap();

        assert_eq!(set.default_animation(), "Idle");
        assert_eq!(set.len(), 4);

        let idle = set.get("Idle").unwrap();
        assert_eq!(idle.mode(), PlaybackMode::Looping);
        assert_eq!(idle.duration_seconds(), 0.5);
        assert_eq!(idle.name(), Some("Idle"));
        assert_eq!(idle.sheet().layout(), UVec2::new(4, 4));

        let attack = set.get("Attack").unwrap();
        assert_eq!(attack.mode(), PlaybackMode::PlayToEnd);
        assert_eq!(attack.duration_seconds(), 0.3);
        // both share the group sheet
        assert!(Arc::ptr_eq(idle.sheet(), attack.sheet()));

        let wave = set.get("Wave").unwrap();
        assert_eq!(wave.mode(), PlaybackMode::PingPong);
        assert_eq!(wave.sheet().texture(), idle.sheet().texture());
        assert_eq!(
            wave.tex_coords(1),
            Rect::new(Vec2::new(0.5, 0.0), Vec2::new(1.0, 1.0))
        );

        let cast = set.get("Cast").unwrap();
        assert_eq!(cast.orientation_offset(), 45.0);
        assert_eq!(cast.sheet().texture().size, UVec2::new(32, 16));
    }

    #[test]
    fn test_invalid_playback_mode() {
        let (mut store, _textures) = store();
        let sheets = HashMap::new();
        let config: SpriteAnimationSetConfig = serde_json::from_str(
            r#"{
                "name": "bad",
                "defaultAnimation": "Idle",
                "spriteSheet": "knight.png",
                "spriteLayout": [4, 4],
                "animations": [{ "name": "Idle", "spriteIndices": [0], "playbackMode": 7 }]
            }"#,
        )
        .unwrap();
        let mut ctx = ConfigContext::new(&mut store, &sheets);
        assert_eq!(config.build(&mut ctx), Err(Error::InvalidPlaybackMode(7)));
    }

    #[test]
    fn test_missing_sheet() {
        let (mut store, _textures) = store();
        let sheets = HashMap::new();
        let config: SpriteAnimationSetConfig = serde_json::from_str(
            r#"{
                "name": "bare",
                "defaultAnimation": "Idle",
                "animations": [{ "name": "Idle", "spriteIndices": [0] }]
            }"#,
        )
        .unwrap();
        let mut ctx = ConfigContext::new(&mut store, &sheets);
        assert_eq!(
            config.build(&mut ctx),
            Err(Error::MissingSpriteSheet("Idle".to_string()))
        );

        let mut ctx = ConfigContext::new(&mut store, &sheets);
        assert_eq!(
            ctx.sheet("knight.png", None),
            Err(Error::MissingSpriteLayout("knight.png".to_string()))
        );
    }

    #[test]
    fn test_build_sprite() {
        let (mut store, textures) = store();
        let knight = textures[0].clone();
        let mut sheets = HashMap::new();
        sheets.insert(
            "knight".to_string(),
            Arc::new(SpriteSheet::new(knight, UVec2::new(4, 4)).unwrap()),
        );
        let config: SpriteConfig = serde_json::from_str(
            r#"{ "name": "shield", "spriteSheet": "knight", "index": 5, "pixelsPerUnit": 16, "pivot": [0.5, 0] }"#,
        )
        .unwrap();
        let mut ctx = ConfigContext::new(&mut store, &sheets);
        let sprite = config.build(&mut ctx).unwrap();
        assert_eq!(sprite.dimensions(), Vec2::ONE);
        assert_eq!(sprite.pivot, Vec2::new(0.5, 0.0));
        assert_eq!(
            sprite.uvs,
            Rect::new(Vec2::new(0.25, 0.25), Vec2::new(0.5, 0.5))
        );

        let config: SpriteConfig =
            serde_json::from_str(r#"{ "name": "banner", "texture": "fx.png" }"#).unwrap();
        let sprite = config.build(&mut ctx).unwrap();
        assert_eq!(sprite.pixel_size(), Vec2::new(32.0, 16.0));
    }

    #[test]
    fn test_sprite_index_out_of_sheet() {
        let (mut store, textures) = store();
        let mut sheets = HashMap::new();
        sheets.insert(
            "knight".to_string(),
            Arc::new(SpriteSheet::new(textures[0].clone(), UVec2::new(4, 4)).unwrap()),
        );
        let mut ctx = ConfigContext::new(&mut store, &sheets);

        let sprite: SpriteConfig =
            serde_json::from_str(r#"{ "name": "shield", "spriteSheet": "knight", "index": 99 }"#)
                .unwrap();
        assert_eq!(
            sprite.build(&mut ctx),
            Err(Error::InvalidSpriteIndex(99, 16))
        );

        let set: SpriteAnimationSetConfig = serde_json::from_str(
            r#"{
                "name": "knight",
                "defaultAnimation": "Idle",
                "spriteSheet": "knight",
                "animations": [{ "name": "Idle", "spriteIndices": [0, 40] }]
            }"#,
        )
        .unwrap();
        assert_eq!(set.build(&mut ctx), Err(Error::InvalidSpriteIndex(40, 16)));
    }

    #[test]
    fn test_invalid_pixels_per_unit() {
        let (mut store, _textures) = store();
        let sheet: SpriteSheetConfig = serde_json::from_str(
            r#"{ "name": "knight", "texture": "knight.png", "layout": [4, 4], "pixelsPerUnit": 0 }"#,
        )
        .unwrap();
        assert_eq!(
            sheet.build(&mut store),
            Err(Error::InvalidPixelsPerUnit(0.0))
        );

        let sheets = HashMap::new();
        let mut ctx = ConfigContext::new(&mut store, &sheets);
        let sprite: SpriteConfig = serde_json::from_str(
            r#"{ "name": "banner", "texture": "fx.png", "pixelsPerUnit": -4 }"#,
        )
        .unwrap();
        assert_eq!(
            sprite.build(&mut ctx),
            Err(Error::InvalidPixelsPerUnit(-4.0))
        );
    }
}
