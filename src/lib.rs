pub mod animation;
pub mod animation_set;
pub mod asset;
pub mod camera;
pub mod config;
pub mod errors;
pub mod handle;
pub mod isometric;
pub mod library;
pub mod prelude;
pub mod sprite;
pub mod sprite_sheet;
pub mod texture;
pub mod types;
