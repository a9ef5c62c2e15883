use std::sync::Arc;

use hashbrown::HashMap;

use crate::{
    animation::{SpriteAnimation, SpriteAnimationDefinition},
    errors::{Error, Result},
    sprite::Sprite,
    texture::Texture,
    types::Rect,
};

/// Named animations shared by every entity of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimationSetDefinition {
    animations: HashMap<String, Arc<SpriteAnimationDefinition>>,
    default_animation: String,
}

impl SpriteAnimationSetDefinition {
    pub fn new<I, S>(default_animation: impl Into<String>, animations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, SpriteAnimationDefinition)>,
        S: Into<String>,
    {
        Self::from_shared(
            default_animation,
            animations
                .into_iter()
                .map(|(name, def)| (name, Arc::new(def))),
        )
    }

    /// Build from definitions that may also be used elsewhere
    pub fn from_shared<I, S>(default_animation: impl Into<String>, animations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Arc<SpriteAnimationDefinition>)>,
        S: Into<String>,
    {
        let default_animation = default_animation.into();
        let mut map = HashMap::new();
        for (name, def) in animations {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(Error::DuplicateAnimation(name));
            }
            map.insert(name, def);
        }
        if !map.contains_key(&default_animation) {
            return Err(Error::NoDefaultAnimation(default_animation));
        }
        Ok(Self {
            animations: map,
            default_animation,
        })
    }

    pub fn default_animation(&self) -> &str {
        &self.default_animation
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SpriteAnimationDefinition>> {
        self.animations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

/// Per-entity playback of a [`SpriteAnimationSetDefinition`].
/// Exactly one animation is active. When a play-to-end animation finishes the
/// set falls back to the default animation.
#[derive(Debug, Clone)]
pub struct SpriteAnimationSet {
    definition: Arc<SpriteAnimationSetDefinition>,
    animations: Vec<(String, SpriteAnimation)>,
    slots: HashMap<String, usize>,
    // index into `animations`
    current: usize,
    default_slot: usize,
}

impl SpriteAnimationSet {
    pub fn new(definition: Arc<SpriteAnimationSetDefinition>) -> Self {
        let mut animations: Vec<_> = definition
            .animations
            .iter()
            .map(|(name, def)| (name.clone(), SpriteAnimation::from_shared(def.clone())))
            .collect();
        animations.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        let slots: HashMap<_, _> = animations
            .iter()
            .enumerate()
            .map(|(slot, (name, _))| (name.clone(), slot))
            .collect();
        // the definition guarantees the default is present
        let default_slot = slots
            .get(&definition.default_animation)
            .copied()
            .unwrap_or_default();
        let mut set = Self {
            definition,
            animations,
            slots,
            current: default_slot,
            default_slot,
        };
        set.current_mut().play_or_resume();
        set
    }

    pub fn definition(&self) -> &Arc<SpriteAnimationSetDefinition> {
        &self.definition
    }

    pub fn update(&mut self, delta_seconds: f32) {
        let current = self.current_mut();
        current.update(delta_seconds);
        if !current.is_finished() {
            return;
        }
        current.reset();
        current.pause();

        log::debug!(
            "Animation {} finished, return to {}",
            self.current_name(),
            self.definition.default_animation()
        );
        self.current = self.default_slot;
        self.current_mut().play_or_resume();
    }

    fn slot(&self, name: &str) -> Result<usize> {
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| Error::NoAnimation(name.to_string()))
    }

    /// Switch the active animation and resume it where it was left
    pub fn set_current(&mut self, name: &str) -> Result<()> {
        self.switch_to(name, true)
    }

    /// Switch the active animation, `resume` false leaves it paused
    pub fn switch_to(&mut self, name: &str, resume: bool) -> Result<()> {
        let slot = self.slot(name)?;
        if slot != self.current {
            log::debug!("Switch animation {} -> {name}", self.current_name());
            self.current = slot;
        }
        let current = self.current_mut();
        if resume {
            current.play_or_resume();
        } else {
            current.pause();
        }
        Ok(())
    }

    pub fn current_name(&self) -> &str {
        &self.animations[self.current].0
    }

    pub fn current(&self) -> &SpriteAnimation {
        &self.animations[self.current].1
    }

    pub fn current_mut(&mut self) -> &mut SpriteAnimation {
        &mut self.animations[self.current].1
    }

    pub fn get(&self, name: &str) -> Option<&SpriteAnimation> {
        self.slot(name).ok().map(|slot| &self.animations[slot].1)
    }

    fn lookup(&self, name: &str) -> Result<&SpriteAnimation> {
        self.slot(name).map(|slot| &self.animations[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn pause(&mut self) {
        self.current_mut().pause();
    }

    pub fn resume(&mut self) {
        self.current_mut().play_or_resume();
    }

    /// Texture coordinates of the visible frame of `name`
    pub fn frame_uvs_for(&self, name: &str) -> Result<Rect> {
        self.lookup(name).map(SpriteAnimation::current_tex_coords)
    }

    pub fn texture_for(&self, name: &str) -> Result<&Texture> {
        self.lookup(name).map(SpriteAnimation::texture)
    }

    pub fn current_tex_coords(&self) -> Rect {
        self.current().current_tex_coords()
    }

    pub fn current_texture(&self) -> &Texture {
        self.current().texture()
    }

    pub fn current_sprite(&self) -> Sprite {
        self.current().current_sprite()
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use glam::UVec2;

    use super::*;
    use crate::{animation::PlaybackMode, asset::TextureStore, sprite_sheet::SpriteSheet};

    fn definition(store: &mut TextureStore) -> Arc<SpriteAnimationSetDefinition> {
        let texture = store.insert("knight", UVec2::new(64, 64), None);
        let sheet = Arc::new(SpriteSheet::new(texture, UVec2::new(4, 4)).unwrap());
        let idle =
            SpriteAnimationDefinition::new(sheet.clone(), vec![0, 1, 2, 3], 1.0, PlaybackMode::Looping)
                .unwrap();
        let attack =
            SpriteAnimationDefinition::new(sheet.clone(), vec![4, 5, 6], 0.3, PlaybackMode::PlayToEnd)
                .unwrap();
        let walk =
            SpriteAnimationDefinition::new(sheet, vec![8, 9, 10, 11], 0.5, PlaybackMode::Looping)
                .unwrap();
        Arc::new(
            SpriteAnimationSetDefinition::new(
                "Idle",
                [("Idle", idle), ("Attack", attack), ("Walk", walk)],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_starts_on_default() {
        let mut store = TextureStore::new(env::temp_dir());
        let set = SpriteAnimationSet::new(definition(&mut store));
        assert_eq!(set.current_name(), "Idle");
        assert!(set.current().is_playing());
        assert!(!set.get("Attack").unwrap().is_playing());
        assert_eq!(set.definition().len(), 3);
    }

    #[test]
    fn test_return_to_default() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut store = TextureStore::new(env::temp_dir());
        let mut set = SpriteAnimationSet::new(definition(&mut store));
        set.set_current("Attack").unwrap();
        assert_eq!(set.current_name(), "Attack");

        set.update(0.125);
        set.update(0.125);
        assert_eq!(set.current_name(), "Attack");
        set.update(0.125);
        assert_eq!(set.current_name(), "Idle");
        assert!(set.current().is_playing());

        let attack = set.get("Attack").unwrap();
        assert!(!attack.is_playing());
        assert!(!attack.is_finished());
        assert_eq!(attack.current_index(), 0);
    }

    #[test]
    fn test_switch_resumes() {
        let mut store = TextureStore::new(env::temp_dir());
        let mut set = SpriteAnimationSet::new(definition(&mut store));
        set.set_current("Walk").unwrap();
        set.update(0.125);
        assert_eq!(set.current().current_index(), 1);

        set.set_current("Idle").unwrap();
        set.update(0.25);
        set.set_current("Walk").unwrap();
        assert_eq!(set.current().current_index(), 1);
        assert_eq!(set.current().seconds_elapsed(), 0.125);
    }

    #[test]
    fn test_switch_without_resume() {
        let mut store = TextureStore::new(env::temp_dir());
        let mut set = SpriteAnimationSet::new(definition(&mut store));
        set.switch_to("Walk", false).unwrap();
        assert_eq!(set.current_name(), "Walk");
        assert!(!set.current().is_playing());
        set.update(0.5);
        assert_eq!(set.current().current_index(), 0);

        // the animation left behind keeps its own state
        assert!(set.get("Idle").unwrap().is_playing());
        assert_eq!(set.switch_to("Run", false), Err(Error::NoAnimation("Run".to_string())));
        assert_eq!(set.current_name(), "Walk");
    }

    #[test]
    fn test_unknown_animation() {
        let mut store = TextureStore::new(env::temp_dir());
        let mut set = SpriteAnimationSet::new(definition(&mut store));
        assert_eq!(
            set.set_current("Jump"),
            Err(Error::NoAnimation("Jump".to_string()))
        );
        assert_eq!(set.current_name(), "Idle");
        assert!(set.frame_uvs_for("Jump").is_err());
        assert!(set.texture_for("Jump").is_err());
        assert_eq!(
            set.frame_uvs_for("Walk").unwrap(),
            set.definition().get("Walk").unwrap().tex_coords(0)
        );
        assert_eq!(set.texture_for("Walk").unwrap().size, UVec2::new(64, 64));
    }

    #[test]
    fn test_pause_current() {
        let mut store = TextureStore::new(env::temp_dir());
        let mut set = SpriteAnimationSet::new(definition(&mut store));
        set.pause();
        set.update(0.5);
        assert_eq!(set.current().current_index(), 0);
        set.resume();
        set.update(0.25);
        assert_eq!(set.current().current_index(), 1);
        assert_eq!(set.current_sprite().uvs, set.current_tex_coords());
    }

    #[test]
    fn test_definition_errors() {
        let mut store = TextureStore::new(env::temp_dir());
        let texture = store.insert("knight", UVec2::new(64, 64), None);
        let sheet = Arc::new(SpriteSheet::new(texture, UVec2::new(4, 4)).unwrap());
        let idle =
            SpriteAnimationDefinition::new(sheet, vec![0], 1.0, PlaybackMode::Looping).unwrap();

        assert_eq!(
            SpriteAnimationSetDefinition::new("Run", [("Idle", idle.clone())]),
            Err(Error::NoDefaultAnimation("Run".to_string()))
        );
        assert_eq!(
            SpriteAnimationSetDefinition::new("Idle", [("Idle", idle.clone()), ("Idle", idle)]),
            Err(Error::DuplicateAnimation("Idle".to_string()))
        );
    }
}
