use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Configuration errors.
/// These are content bugs: a definition that fails to build should not be retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid playback mode {0}, expected 0, 1 or 2")]
    InvalidPlaybackMode(u32),
    #[error("animation has no frames")]
    EmptyFrames,
    #[error("invalid animation duration {0}")]
    InvalidDuration(f32),
    #[error("invalid fps {0}")]
    InvalidFps(f32),
    #[error("invalid sprite layout {0}x{1}")]
    InvalidLayout(u32, u32),
    #[error("sprite index {0} out of {1} sprites")]
    InvalidSpriteIndex(u32, u32),
    #[error("invalid pixels per unit {0}")]
    InvalidPixelsPerUnit(f32),
    #[error("animation {0} has no sprite sheet")]
    MissingSpriteSheet(String),
    #[error("sprite sheet {0} has no layout")]
    MissingSpriteLayout(String),
    #[error("no animation {0}")]
    NoAnimation(String),
    #[error("default animation {0} is not defined")]
    NoDefaultAnimation(String),
    #[error("duplicate animation {0}")]
    DuplicateAnimation(String),
    #[error("no animation set {0}")]
    NoAnimationSet(String),
    #[error("no sprite sheet {0}")]
    NoSpriteSheet(String),
    #[error("no sprite {0}")]
    NoSprite(String),
    #[error("no texture {0}")]
    NoTexture(String),
    #[error("no directional variant {0}")]
    MissingVariant(String),
}
