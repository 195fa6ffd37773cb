//! atlasc - Sprite atlas packer
//!
//! A library for packing individually authored sprite images into a single
//! texture atlas, together with the layout metadata a renderer needs to find
//! each sprite (and its tile parts or animation pivots) inside it.

pub mod atlas;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod output;

pub use atlas::{
    atlas_width, compose, load_sprites, pack, render_layout, visible_bounds, write_atlas,
    write_layout, PackedSize,
};
pub use error::{AtlasError, Result};
pub use manifest::{AnimFrame, AssetKind, Manifest, Pos, Rect, Sprite, TileObject, TilePart};
