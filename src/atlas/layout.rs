//! Layout metadata serialization.
//!
//! Emits the line-oriented `[images]` / `[objects]` / `[tiles]` /
//! `[animation]` sections consumed by the runtime. The header comments,
//! column order and section order are part of the format: renderers index
//! into these tables by line position, so nothing here may be reordered or
//! reformatted.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{AtlasError, Result};
use crate::manifest::{AnimFrame, AssetKind, Manifest, Sprite, TileObject};

/// Render the full layout document for a packed manifest.
pub fn render(manifest: &Manifest) -> String {
    let mut out = String::new();

    write_images(&manifest.sprites, &mut out);
    match manifest.kind {
        AssetKind::Tile => write_tile_objects(&manifest.objects, &mut out),
        AssetKind::Anim => write_animation(&manifest.frames, &mut out),
        AssetKind::Sheet => {}
    }

    out
}

/// Write the layout document to `path`.
pub fn write(manifest: &Manifest, path: &Path) -> Result<()> {
    fs::write(path, render(manifest)).map_err(|e| AtlasError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write layout: {}", e),
    })
}

fn write_images(sprites: &[Sprite], out: &mut String) {
    out.push_str("[images]\n");
    out.push_str("#id,posx,posy,width,height\n");
    for s in sprites {
        let _ = writeln!(out, "{},{},{},{},{}", s.id, s.x, s.y, s.width, s.height);
    }
}

fn write_tile_objects(objects: &[TileObject], out: &mut String) {
    out.push_str("\n[objects]\n");
    out.push_str("#id,tile_start,tiles\n");
    // tile_start is a flat running index into the [tiles] table below
    let mut start_index = 0u32;
    for obj in objects {
        let _ = writeln!(out, "{},{},{}", obj.id, start_index, obj.part_count);
        start_index += obj.part_count;
    }

    out.push_str("\n[tiles]\n");
    out.push_str("#objid,x,y,posx,posy,width,height\n");
    for obj in objects {
        for part in &obj.parts {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{}",
                obj.id,
                part.x,
                part.y,
                part.rect.x,
                part.rect.y,
                part.rect.width,
                part.rect.height
            );
        }
    }
}

fn write_animation(frames: &[AnimFrame], out: &mut String) {
    out.push_str("\n[animation]\n");
    out.push_str("#frame,pivot_x,pivot_y\n");
    for frame in frames {
        let _ = writeln!(out, "{},{},{}", frame.id, frame.center.x, frame.center.y);
    }
}
