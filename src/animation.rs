//! Sprite animation definitions and playback.
//!
//! A [`SpriteAnimationDefinition`] is immutable and usually shared between many
//! [`SpriteAnimation`]s through an [`Arc`]. Each [`SpriteAnimation`] carries its
//! own playback state and is advanced once per frame with [`SpriteAnimation::update`].

use std::{ops::Deref, ops::RangeInclusive, sync::Arc};

use crate::{
    errors::{Error, Result},
    sprite::Sprite,
    sprite_sheet::SpriteSheet,
    texture::Texture,
    types::Rect,
};

/// How an animation behaves once it reaches its last frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackMode {
    /// Stop on the last frame and report finished
    PlayToEnd,
    /// Start over from the first frame
    #[default]
    Looping,
    /// Run backwards to the first frame, then forwards again
    PingPong,
}

impl TryFrom<u32> for PlaybackMode {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::PlayToEnd),
            1 => Ok(Self::Looping),
            2 => Ok(Self::PingPong),
            _ => Err(Error::InvalidPlaybackMode(value)),
        }
    }
}

impl From<PlaybackMode> for u32 {
    fn from(mode: PlaybackMode) -> Self {
        match mode {
            PlaybackMode::PlayToEnd => 0,
            PlaybackMode::Looping => 1,
            PlaybackMode::PingPong => 2,
        }
    }
}

/// Relative slack when comparing accumulated time against frame boundaries.
/// Summed f32 deltas land a few ulps short of `frame_duration * n`.
const TIME_TOLERANCE: f32 = 1e-5;

fn reached(elapsed_seconds: f32, boundary_seconds: f32) -> bool {
    elapsed_seconds + boundary_seconds * TIME_TOLERANCE >= boundary_seconds
}

/// Sprite animation definition
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimationDefinition {
    name: Option<String>,
    sheet: Arc<SpriteSheet>,
    frames: Vec<u32>,
    duration_seconds: f32,
    frame_duration_seconds: f32,
    mode: PlaybackMode,
    // degrees
    orientation_offset: f32,
}

impl SpriteAnimationDefinition {
    /// Play `frames` (sprite sheet indices) in order over `duration_seconds`
    pub fn new(
        sheet: Arc<SpriteSheet>,
        frames: Vec<u32>,
        duration_seconds: f32,
        mode: PlaybackMode,
    ) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::EmptyFrames);
        }
        if !(duration_seconds > 0.0 && duration_seconds.is_finite()) {
            return Err(Error::InvalidDuration(duration_seconds));
        }
        for &index in &frames {
            sheet.check_index(index)?;
        }
        let frame_duration_seconds = duration_seconds / frames.len() as f32;
        Ok(Self {
            name: None,
            sheet,
            frames,
            duration_seconds,
            frame_duration_seconds,
            mode,
            orientation_offset: 0.0,
        })
    }

    /// Play the contiguous sprite indices `range`
    pub fn from_range(
        sheet: Arc<SpriteSheet>,
        range: RangeInclusive<u32>,
        duration_seconds: f32,
        mode: PlaybackMode,
    ) -> Result<Self> {
        Self::new(sheet, range.collect(), duration_seconds, mode)
    }

    /// Play `frames` at a fixed rate of `fps` frames per second
    pub fn from_fps(
        sheet: Arc<SpriteSheet>,
        frames: Vec<u32>,
        fps: f32,
        mode: PlaybackMode,
    ) -> Result<Self> {
        if !(fps > 0.0 && fps.is_finite()) {
            return Err(Error::InvalidFps(fps));
        }
        let duration_seconds = frames.len() as f32 / fps;
        Self::new(sheet, frames, duration_seconds, mode)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_orientation_offset(mut self, degrees: f32) -> Self {
        self.orientation_offset = degrees;
        self
    }

    pub fn with_duration(mut self, duration_seconds: f32) -> Result<Self> {
        if !(duration_seconds > 0.0 && duration_seconds.is_finite()) {
            return Err(Error::InvalidDuration(duration_seconds));
        }
        self.duration_seconds = duration_seconds;
        self.frame_duration_seconds = duration_seconds / self.frames.len() as f32;
        Ok(self)
    }

    pub fn with_fps(self, fps: f32) -> Result<Self> {
        if !(fps > 0.0 && fps.is_finite()) {
            return Err(Error::InvalidFps(fps));
        }
        let duration_seconds = self.frames.len() as f32 / fps;
        self.with_duration(duration_seconds)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sheet(&self) -> &Arc<SpriteSheet> {
        &self.sheet
    }

    pub fn frames(&self) -> &[u32] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn duration_seconds(&self) -> f32 {
        self.duration_seconds
    }

    pub fn frame_duration_seconds(&self) -> f32 {
        self.frame_duration_seconds
    }

    pub fn fps(&self) -> f32 {
        1.0 / self.frame_duration_seconds
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Orientation offset in degrees
    pub fn orientation_offset(&self) -> f32 {
        self.orientation_offset
    }

    pub fn start_sprite_index(&self) -> u32 {
        self.frames[0]
    }

    pub fn end_sprite_index(&self) -> u32 {
        self.frames[self.frames.len() - 1]
    }

    /// Sprite sheet index shown at `frame`
    pub fn sprite_index(&self, frame: usize) -> u32 {
        debug_assert!(frame < self.frames.len());
        self.frames[frame]
    }

    pub fn tex_coords(&self, frame: usize) -> Rect {
        self.sheet.tex_coords_for_index(self.sprite_index(frame))
    }
}

/// Either a definition private to one animation or one shared with others
#[derive(Debug, Clone)]
pub enum DefinitionRef {
    Owned(Box<SpriteAnimationDefinition>),
    Shared(Arc<SpriteAnimationDefinition>),
}

impl Deref for DefinitionRef {
    type Target = SpriteAnimationDefinition;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Owned(def) => &**def,
            Self::Shared(def) => &**def,
        }
    }
}

impl From<SpriteAnimationDefinition> for DefinitionRef {
    fn from(def: SpriteAnimationDefinition) -> Self {
        Self::Owned(Box::new(def))
    }
}

impl From<Arc<SpriteAnimationDefinition>> for DefinitionRef {
    fn from(def: Arc<SpriteAnimationDefinition>) -> Self {
        Self::Shared(def)
    }
}

/// Playback state of one animation
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    definition: DefinitionRef,
    // seconds since the current sweep started
    elapsed_seconds: f32,
    current_index: usize,
    // index where the current ping-pong sweep started, 0 for other modes
    sweep_start: usize,
    direction: i32,
    playing: bool,
    finished: bool,
}

impl SpriteAnimation {
    pub fn new(definition: impl Into<DefinitionRef>) -> Self {
        Self {
            definition: definition.into(),
            elapsed_seconds: 0.0,
            current_index: 0,
            sweep_start: 0,
            direction: 1,
            playing: false,
            finished: false,
        }
    }

    /// Animation that owns its definition
    pub fn new_owned(definition: SpriteAnimationDefinition) -> Self {
        Self::new(definition)
    }

    /// Animation that plays a shared definition
    pub fn from_shared(definition: Arc<SpriteAnimationDefinition>) -> Self {
        Self::new(definition)
    }

    pub fn definition(&self) -> &SpriteAnimationDefinition {
        &self.definition
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.definition, DefinitionRef::Owned(_))
    }

    /// Advance playback by `delta_seconds`.
    /// At most one frame is advanced per call.
    pub fn update(&mut self, delta_seconds: f32) {
        if !self.playing || self.finished {
            return;
        }
        self.elapsed_seconds += delta_seconds;

        let frame_count = self.definition.frame_count();
        let duration_seconds = self.definition.duration_seconds();
        let frame_end = self.definition.frame_duration_seconds()
            * (self.current_index.abs_diff(self.sweep_start) + 1) as f32;
        let advance = reached(self.elapsed_seconds, frame_end);

        match self.definition.mode() {
            PlaybackMode::PlayToEnd => {
                if advance {
                    self.current_index += 1;
                }
                if self.current_index >= frame_count
                    || reached(self.elapsed_seconds, duration_seconds)
                {
                    self.current_index = frame_count - 1;
                    self.finished = true;
                    self.playing = false;
                    self.elapsed_seconds = 0.0;
                }
            }
            PlaybackMode::Looping => {
                if advance {
                    self.current_index = (self.current_index + 1) % frame_count;
                    if self.current_index == 0 {
                        self.elapsed_seconds = 0.0;
                    }
                }
            }
            PlaybackMode::PingPong => {
                if advance {
                    let next = self.current_index as i64 + self.direction as i64;
                    if next >= frame_count as i64 {
                        self.direction = -1;
                        self.current_index = frame_count.saturating_sub(2);
                        self.sweep_start = self.current_index;
                        self.elapsed_seconds = 0.0;
                    } else if next < 0 {
                        self.direction = 1;
                        self.current_index = 1.min(frame_count - 1);
                        self.sweep_start = self.current_index;
                        self.elapsed_seconds = 0.0;
                    } else {
                        self.current_index = next as usize;
                    }
                }
            }
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Start or continue playback, a finished animation starts over
    pub fn play_or_resume(&mut self) {
        if self.finished {
            self.reset();
        } else {
            self.playing = true;
        }
    }

    /// Rewind to the first frame and play
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.sweep_start = 0;
        self.direction = 1;
        self.elapsed_seconds = 0.0;
        self.finished = false;
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Index into the definition's frame list
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// 1 while running forward, -1 while a ping-pong animation runs backward
    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn mode(&self) -> PlaybackMode {
        self.definition.mode()
    }

    pub fn seconds_elapsed(&self) -> f32 {
        self.elapsed_seconds
    }

    pub fn seconds_remaining(&self) -> f32 {
        self.definition.duration_seconds() - self.elapsed_seconds
    }

    pub fn fraction_elapsed(&self) -> f32 {
        self.elapsed_seconds / self.definition.duration_seconds()
    }

    pub fn fraction_remaining(&self) -> f32 {
        1.0 - self.fraction_elapsed()
    }

    /// Jump to `seconds` from the first frame, the visible frame follows.
    /// A ping-pong animation is put back on its forward sweep.
    pub fn set_seconds_elapsed(&mut self, seconds: f32) {
        let duration_seconds = self.definition.duration_seconds();
        let seconds = seconds.clamp(0.0, duration_seconds);
        let frame_count = self.definition.frame_count();
        let frame = (seconds / self.definition.frame_duration_seconds()) as usize;
        self.elapsed_seconds = seconds;
        self.current_index = frame.min(frame_count - 1);
        self.sweep_start = 0;
        self.direction = 1;
    }

    pub fn set_fraction_elapsed(&mut self, fraction: f32) {
        self.set_seconds_elapsed(fraction * self.definition.duration_seconds());
    }

    /// Sprite sheet index of the visible frame
    pub fn current_sprite_index(&self) -> u32 {
        self.definition.sprite_index(self.current_index)
    }

    pub fn current_tex_coords(&self) -> Rect {
        self.definition.tex_coords(self.current_index)
    }

    pub fn current_sprite(&self) -> Sprite {
        self.definition.sheet().sprite(self.current_sprite_index())
    }

    pub fn texture(&self) -> &Texture {
        self.definition.sheet().texture()
    }
}
