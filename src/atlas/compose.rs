//! Atlas compositing.
//!
//! Blits every trimmed sprite region onto a transparent canvas at its
//! assigned placement, then writes the canvas out as a PNG.

use std::path::Path;

use image::{imageops, GenericImageView, RgbaImage};

use crate::error::{AtlasError, Result};
use crate::manifest::Sprite;

/// Composite the sprites onto a transparent `width` x `height` canvas.
///
/// Each sprite contributes the `width`x`height` window of its source image
/// starting at its trim offset, alpha-blended source-over so the partially
/// transparent edges of trimmed sprites survive.
pub fn compose(sprites: &[Sprite], images: &[RgbaImage], width: u32, height: u32) -> RgbaImage {
    let mut atlas = RgbaImage::new(width, height);

    for sprite in sprites {
        let source = images[sprite.id as usize]
            .view(sprite.xoffset, sprite.yoffset, sprite.width, sprite.height)
            .to_image();
        imageops::overlay(
            &mut atlas,
            &source,
            i64::from(sprite.x),
            i64::from(sprite.y),
        );
    }

    atlas
}

/// Write the atlas image to `path`.
pub fn write_atlas(atlas: &RgbaImage, path: &Path) -> Result<()> {
    atlas.save(path).map_err(|e| AtlasError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write atlas: {}", e),
    })
}
