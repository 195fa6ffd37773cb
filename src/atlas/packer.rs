//! Shelf packer.
//!
//! Assigns atlas positions with a greedy row scan: sprites go left-to-right
//! with a one-pixel gutter, and a new row opens above the tallest extent
//! reached so far once the current row is full.

use std::collections::HashMap;

use crate::error::{AtlasError, Result};
use crate::manifest::{Sprite, TileObject};

/// Gutter between neighbouring sprites so texture samplers cannot bleed.
pub const PADDING: u32 = 1;

/// Extent of the atlas area actually covered by placements, gutter included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedSize {
    pub width: u32,
    pub height: u32,
}

/// Assign an atlas position to every sprite.
///
/// With `sort` set, sprites are processed shortest-first; the sort is stable,
/// so equal heights keep manifest order. Tile part rects are shifted from
/// sprite-local to atlas coordinates as their owning sprite is placed, and
/// stay atlas-absolute from then on.
///
/// Fails when the row counter is still empty and the next sprite cannot fit
/// at `max_width`: nothing useful can be packed into such an atlas.
pub fn pack(
    sprites: &mut [Sprite],
    mut objects: Option<&mut [TileObject]>,
    max_width: u32,
    sort: bool,
) -> Result<PackedSize> {
    let mut order: Vec<usize> = (0..sprites.len()).collect();
    if sort {
        order.sort_by_key(|&i| sprites[i].height);
    }

    let object_index: HashMap<u32, usize> = match &objects {
        Some(objs) => objs.iter().enumerate().map(|(i, o)| (o.id, i)).collect(),
        None => HashMap::new(),
    };

    let mut posx = 0u32;
    let mut posy = 0u32;
    let mut maxx = 0u32;
    let mut maxy = 0u32;
    let mut placed_in_row = 0u32;

    for &i in &order {
        let (w, h) = (sprites[i].width, sprites[i].height);

        // The overflow check counts the trailing gutter too.
        if posx + w + PADDING > max_width {
            if placed_in_row == 0 {
                return Err(AtlasError::Pack {
                    message: "texture width too small".to_string(),
                    help: Some(format!(
                        "sprite {} is {}px wide but the atlas is limited to {}px",
                        sprites[i].id, w, max_width
                    )),
                });
            }
            placed_in_row = 0;
            posx = 0;
            posy = maxy + PADDING;
        } else {
            placed_in_row += 1;
        }

        sprites[i].x = posx;
        sprites[i].y = posy;

        if let Some(objs) = objects.as_deref_mut() {
            if let Some(&oi) = object_index.get(&sprites[i].id) {
                for part in &mut objs[oi].parts {
                    part.rect.x += posx;
                    part.rect.y += posy;
                }
            }
        }

        posx += w + PADDING;
        maxx = maxx.max(posx);
        maxy = maxy.max(posy + h);
    }

    Ok(PackedSize {
        width: maxx,
        height: maxy,
    })
}

/// Final atlas width for a packed layout.
///
/// When the used extent fits into half the configured width, the allocation
/// is halved once. Placements stay valid: `packed.width <= max_width / 2`
/// means every assigned `x` already fits the halved width.
pub fn atlas_width(packed: PackedSize, max_width: u32) -> u32 {
    if packed.width <= max_width / 2 {
        max_width / 2
    } else {
        max_width
    }
}
