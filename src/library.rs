use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use hashbrown::HashMap;

use crate::{
    animation_set::{SpriteAnimationSet, SpriteAnimationSetDefinition},
    asset::TextureStore,
    config::{ConfigContext, LibraryConfig},
    errors::{self, Error},
    isometric::{IsometricSpriteAnimationSet, IsometricSpriteAnimationSetDefinition},
    sprite::Sprite,
    sprite_sheet::SpriteSheet,
};

/// Definitions loaded for a game session.
/// Entities build their own animation sets from the shared definitions here.
pub struct SpriteLibrary {
    textures: TextureStore,
    sheets: HashMap<String, Arc<SpriteSheet>>,
    sprites: HashMap<String, Sprite>,
    animation_sets: HashMap<String, Arc<SpriteAnimationSetDefinition>>,
    isometric_sets: HashMap<String, Arc<IsometricSpriteAnimationSetDefinition>>,
}

impl SpriteLibrary {
    pub fn new(textures: TextureStore) -> Self {
        Self {
            textures,
            sheets: Default::default(),
            sprites: Default::default(),
            animation_sets: Default::default(),
            isometric_sets: Default::default(),
        }
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }

    /// Parse a JSON library and load it
    pub fn from_json(&mut self, json: &str) -> Result<()> {
        let config: LibraryConfig = serde_json::from_str(json).context("parse sprite library")?;
        self.load(&config)?;
        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("read sprite library {}", path.display()))?;
        self.from_json(&json)
            .with_context(|| format!("load sprite library {}", path.display()))
    }

    /// Build every entry of `config`, entries replace previous ones with the same name.
    /// Nothing is committed unless every entry builds.
    pub fn load(&mut self, config: &LibraryConfig) -> errors::Result<()> {
        let mut sheets = self.sheets.clone();
        for sheet_config in &config.sprite_sheets {
            let sheet = sheet_config.build(&mut self.textures)?;
            if sheets
                .insert(sheet_config.name.clone(), Arc::new(sheet))
                .is_some()
            {
                log::warn!("Replace sprite sheet {}", sheet_config.name);
            }
        }

        let mut ctx = ConfigContext::new(&mut self.textures, &sheets);
        let mut sprites = Vec::with_capacity(config.sprites.len());
        for sprite_config in &config.sprites {
            sprites.push((sprite_config.name.clone(), sprite_config.build(&mut ctx)?));
        }
        let mut sets = Vec::with_capacity(config.animation_sets.len());
        for set_config in &config.animation_sets {
            let def = Arc::new(set_config.build(&mut ctx)?);
            let iso = if set_config.isometric {
                Some(Arc::new(IsometricSpriteAnimationSetDefinition::new(
                    def.clone(),
                )?))
            } else {
                None
            };
            sets.push((set_config.name.clone(), def, iso));
        }

        self.sheets = sheets;
        self.sprites.extend(sprites);
        for (name, def, iso) in sets {
            if let Some(iso) = iso {
                self.isometric_sets.insert(name.clone(), iso);
            }
            self.animation_sets.insert(name, def);
        }
        log::info!(
            "Loaded {} sprite sheets, {} sprites, {} animation sets",
            config.sprite_sheets.len(),
            config.sprites.len(),
            config.animation_sets.len()
        );
        Ok(())
    }

    pub fn insert_sheet(&mut self, name: &str, sheet: SpriteSheet) -> Arc<SpriteSheet> {
        let sheet = Arc::new(sheet);
        if self.sheets.insert(name.to_string(), sheet.clone()).is_some() {
            log::warn!("Replace sprite sheet {name}");
        }
        sheet
    }

    pub fn insert_animation_set(
        &mut self,
        name: &str,
        def: SpriteAnimationSetDefinition,
    ) -> Arc<SpriteAnimationSetDefinition> {
        let def = Arc::new(def);
        if self
            .animation_sets
            .insert(name.to_string(), def.clone())
            .is_some()
        {
            log::warn!("Replace animation set {name}");
        }
        def
    }

    pub fn sheet(&self, name: &str) -> errors::Result<&Arc<SpriteSheet>> {
        self.sheets
            .get(name)
            .ok_or_else(|| Error::NoSpriteSheet(name.to_string()))
    }

    pub fn sprite(&self, name: &str) -> errors::Result<&Sprite> {
        self.sprites
            .get(name)
            .ok_or_else(|| Error::NoSprite(name.to_string()))
    }

    pub fn animation_set(&self, name: &str) -> errors::Result<&Arc<SpriteAnimationSetDefinition>> {
        self.animation_sets
            .get(name)
            .ok_or_else(|| Error::NoAnimationSet(name.to_string()))
    }

    pub fn isometric_set(
        &self,
        name: &str,
    ) -> errors::Result<&Arc<IsometricSpriteAnimationSetDefinition>> {
        self.isometric_sets
            .get(name)
            .ok_or_else(|| Error::NoAnimationSet(name.to_string()))
    }

    /// New per-entity playback of the set `name`
    pub fn new_animation_set(&self, name: &str) -> errors::Result<SpriteAnimationSet> {
        self.animation_set(name)
            .map(|def| SpriteAnimationSet::new(def.clone()))
    }

    pub fn new_isometric_set(&self, name: &str) -> errors::Result<IsometricSpriteAnimationSet> {
        self.isometric_set(name)
            .map(|def| IsometricSpriteAnimationSet::new(def.clone()))
    }

    /// Drop every definition and release textures nothing else holds
    /// return released texture count
    pub fn unload(&mut self) -> usize {
        self.sheets.clear();
        self.sprites.clear();
        self.animation_sets.clear();
        self.isometric_sets.clear();
        self.textures.collect_garbage()
    }
}
