//! Directional animation sets for isometric views.
//!
//! Each logical animation ("Walk") is stored in two variants, one seen from
//! behind and one seen from the front. The other two facing quadrants reuse
//! them mirrored horizontally, see [`Quadrant::scale`].

use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};

use crate::{
    animation_set::{SpriteAnimationSet, SpriteAnimationSetDefinition},
    camera::CameraView,
    errors::{Error, Result},
    sprite::Sprite,
    texture::Texture,
    types::Rect,
};

/// Suffix of variants drawn facing away from the viewer, to the left
pub const AWAY_LEFT_SUFFIX: &str = "_AwayLeft";
/// Suffix of variants drawn facing the viewer, to the right
pub const TOWARD_RIGHT_SUFFIX: &str = "_TowardRight";

/// Camera relative facing of an actor
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    FrontLeft,
    #[default]
    FrontRight,
    BackLeft,
    BackRight,
}

impl Quadrant {
    /// Resolve the quadrant of `actor_forward` as seen by `camera`.
    /// Both are flattened onto the XZ plane first. An actor facing against
    /// the camera forward is in a back quadrant.
    pub fn from_facing(actor_forward: Vec3, camera: &impl CameraView) -> Self {
        let actor = on_ground(actor_forward);
        let is_back = on_ground(camera.forward()).dot(actor) < 0.0;
        let is_right = on_ground(camera.right()).dot(actor) > 0.0;
        match (is_back, is_right) {
            (false, false) => Self::FrontLeft,
            (false, true) => Self::FrontRight,
            (true, false) => Self::BackLeft,
            (true, true) => Self::BackRight,
        }
    }

    pub fn is_back(self) -> bool {
        matches!(self, Self::BackLeft | Self::BackRight)
    }

    pub fn is_right(self) -> bool {
        matches!(self, Self::FrontRight | Self::BackRight)
    }

    /// Name suffix of the stored variant drawn for this quadrant
    pub fn suffix(self) -> &'static str {
        if self.is_back() {
            AWAY_LEFT_SUFFIX
        } else {
            TOWARD_RIGHT_SUFFIX
        }
    }

    /// Scale applied to the stored variant, -1 on x mirrors it
    pub fn scale(self) -> Vec2 {
        match self {
            Self::FrontLeft | Self::BackRight => Vec2::new(-1.0, 1.0),
            Self::BackLeft | Self::FrontRight => Vec2::ONE,
        }
    }

    fn from_suffixed(name: &str) -> Self {
        if name.ends_with(AWAY_LEFT_SUFFIX) {
            Self::BackLeft
        } else {
            Self::FrontRight
        }
    }
}

fn on_ground(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Strip a direction suffix, "Walk_AwayLeft" becomes "Walk"
pub fn strip_direction_suffix(name: &str) -> &str {
    name.strip_suffix(AWAY_LEFT_SUFFIX)
        .or_else(|| name.strip_suffix(TOWARD_RIGHT_SUFFIX))
        .unwrap_or(name)
}

fn has_direction_suffix(name: &str) -> bool {
    name.ends_with(AWAY_LEFT_SUFFIX) || name.ends_with(TOWARD_RIGHT_SUFFIX)
}

/// Animation set definition whose directional animations come in pairs
#[derive(Debug, Clone, PartialEq)]
pub struct IsometricSpriteAnimationSetDefinition {
    set: Arc<SpriteAnimationSetDefinition>,
}

impl IsometricSpriteAnimationSetDefinition {
    /// Every animation named with a direction suffix needs its counterpart.
    /// Animations without a suffix are played as is from every direction.
    pub fn new(set: impl Into<Arc<SpriteAnimationSetDefinition>>) -> Result<Self> {
        let set = set.into();
        for name in set.names() {
            if !has_direction_suffix(name) {
                continue;
            }
            let base = strip_direction_suffix(name);
            for suffix in [AWAY_LEFT_SUFFIX, TOWARD_RIGHT_SUFFIX] {
                let variant = format!("{base}{suffix}");
                if !set.contains(&variant) {
                    return Err(Error::MissingVariant(variant));
                }
            }
        }
        Ok(Self { set })
    }

    pub fn set(&self) -> &Arc<SpriteAnimationSetDefinition> {
        &self.set
    }

    /// Animation names with direction suffixes removed, sorted
    pub fn logical_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.set.names().map(strip_direction_suffix).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Per-entity playback of an [`IsometricSpriteAnimationSetDefinition`]
#[derive(Debug, Clone)]
pub struct IsometricSpriteAnimationSet {
    definition: Arc<IsometricSpriteAnimationSetDefinition>,
    set: SpriteAnimationSet,
    quadrant: Quadrant,
}

impl IsometricSpriteAnimationSet {
    pub fn new(definition: Arc<IsometricSpriteAnimationSetDefinition>) -> Self {
        let set = SpriteAnimationSet::new(definition.set.clone());
        let quadrant = Quadrant::from_suffixed(set.current_name());
        Self {
            definition,
            set,
            quadrant,
        }
    }

    pub fn definition(&self) -> &Arc<IsometricSpriteAnimationSetDefinition> {
        &self.definition
    }

    pub fn set(&self) -> &SpriteAnimationSet {
        &self.set
    }

    pub fn set_mut(&mut self) -> &mut SpriteAnimationSet {
        &mut self.set
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    /// Scale to draw the current frame with
    pub fn scale(&self) -> Vec2 {
        if has_direction_suffix(self.set.current_name()) {
            self.quadrant.scale()
        } else {
            Vec2::ONE
        }
    }

    /// Current animation name without direction suffix
    pub fn logical_name(&self) -> &str {
        strip_direction_suffix(self.set.current_name())
    }

    /// Rewrite `name` for the current facing quadrant
    pub fn animation_name_for_facing_direction(&self, name: &str) -> String {
        format!("{}{}", strip_direction_suffix(name), self.quadrant.suffix())
    }

    fn resolve(&self, name: &str) -> Result<String> {
        let directional = self.animation_name_for_facing_direction(name);
        if self.set.contains(&directional) {
            return Ok(directional);
        }
        let base = strip_direction_suffix(name);
        if self.set.contains(base) {
            Ok(base.to_string())
        } else {
            Err(Error::NoAnimation(name.to_string()))
        }
    }

    /// Play the logical animation `name` in the variant for the current facing
    pub fn play(&mut self, name: &str) -> Result<()> {
        let resolved = self.resolve(name)?;
        self.set.set_current(&resolved)
    }

    /// Recompute the facing quadrant and switch to the matching variant.
    /// The current animation's orientation offset rotates `actor_forward` about +Y.
    pub fn set_facing(&mut self, actor_forward: Vec3, camera: &impl CameraView) -> Result<()> {
        let offset = self.set.current().definition().orientation_offset();
        let actor_forward = if offset != 0.0 {
            Quat::from_rotation_y(offset.to_radians()) * actor_forward
        } else {
            actor_forward
        };
        let quadrant = Quadrant::from_facing(actor_forward, camera);
        if quadrant != self.quadrant {
            log::debug!("Facing {:?} -> {:?}", self.quadrant, quadrant);
            self.quadrant = quadrant;
        }
        let resolved = self.resolve(self.set.current_name())?;
        if resolved != self.set.current_name() {
            // a paused actor stays paused while turning
            let playing = self.set.current().is_playing();
            self.set.switch_to(&resolved, playing)?;
        }
        Ok(())
    }

    pub fn update(
        &mut self,
        delta_seconds: f32,
        actor_forward: Vec3,
        camera: &impl CameraView,
    ) -> Result<()> {
        self.set.update(delta_seconds);
        self.set_facing(actor_forward, camera)
    }

    pub fn current_tex_coords(&self) -> Rect {
        self.set.current_tex_coords()
    }

    pub fn current_texture(&self) -> &Texture {
        self.set.current_texture()
    }

    /// Visible frame, mirrored when the quadrant asks for it
    pub fn current_sprite(&self) -> Sprite {
        let sprite = self.set.current_sprite();
        let flip_x = self.scale().x < 0.0;
        sprite.with_flip(flip_x, false)
    }
}
