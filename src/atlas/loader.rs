//! Sprite image loading and trimming.
//!
//! Loads one PNG per sprite id from the manifest directory. In anim mode
//! every sprite is tightened to the bounding box of its visible pixels and
//! the matching frame pivot is shifted by the same trim offset, so the pivot
//! stays correct relative to the cropped sprite that ends up in the atlas.

use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;

use crate::error::{AtlasError, Result};
use crate::manifest::{AnimFrame, Sprite};

/// Tight bounding box of the pixels with nonzero alpha, as
/// `(left, top, right, bottom)` with exclusive right/bottom edges.
///
/// Returns `None` for a fully transparent image.
pub fn visible_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((left, top, right, bottom)) => (
                left.min(x),
                top.min(y),
                right.max(x + 1),
                bottom.max(y + 1),
            ),
        });
    }

    bounds
}

/// Load every sprite image from `dir`, filling in trim geometry.
///
/// Returns the decoded images, positionally aligned with `sprites`. With a
/// frame table supplied the sprites are trimmed and pivots adjusted;
/// otherwise the manifest dimensions are kept and offsets stay zero.
pub fn load_sprites(
    sprites: &mut [Sprite],
    mut frames: Option<&mut [AnimFrame]>,
    dir: &Path,
) -> Result<Vec<RgbaImage>> {
    let frame_index: HashMap<u32, usize> = match frames.as_deref() {
        Some(frames) => frames.iter().enumerate().map(|(i, f)| (f.id, i)).collect(),
        None => HashMap::new(),
    };

    let mut images = Vec::with_capacity(sprites.len());

    for sprite in sprites.iter_mut() {
        let path = dir.join(format!("{}.png", sprite.id));
        let img = image::open(&path)
            .map_err(|e| AtlasError::Load {
                path: path.clone(),
                message: format!("Failed to decode sprite: {}", e),
            })?
            .to_rgba8();

        if let Some(frames) = frames.as_deref_mut() {
            let (left, top, right, bottom) =
                visible_bounds(&img).ok_or_else(|| AtlasError::Load {
                    path: path.clone(),
                    message: "sprite is fully transparent, nothing to trim to".to_string(),
                })?;

            sprite.xoffset = left;
            sprite.yoffset = top;
            sprite.width = right - left;
            sprite.height = bottom - top;

            let idx = frame_index.get(&sprite.id).ok_or_else(|| AtlasError::Load {
                path: path.clone(),
                message: format!("no animation frame for sprite {}", sprite.id),
            })?;
            let center = &mut frames[*idx].center;
            center.x -= left as i32;
            center.y -= top as i32;
        } else {
            sprite.xoffset = 0;
            sprite.yoffset = 0;
            if sprite.width > img.width() || sprite.height > img.height() {
                return Err(AtlasError::Load {
                    path,
                    message: format!(
                        "manifest size {}x{} exceeds image size {}x{}",
                        sprite.width,
                        sprite.height,
                        img.width(),
                        img.height()
                    ),
                });
            }
        }

        images.push(img);
    }

    Ok(images)
}
