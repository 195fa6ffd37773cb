//! Pack command implementation.
//!
//! The full pipeline for one manifest: load and validate, load sprite
//! images (trimming in anim mode), shelf-pack, composite, and write the
//! atlas PNG plus the layout file. Output files are only written once
//! packing has succeeded, so a failed run leaves nothing behind.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::atlas;
use crate::error::Result;
use crate::manifest::{AssetKind, Manifest};
use crate::output::{display_path, plural, Printer};

/// Default atlas width limit in pixels.
const DEFAULT_MAX_WIDTH: u32 = 1024;

/// Pack sprites into a texture atlas and a layout file
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Manifest describing the sprites to pack
    #[arg(required = true)]
    pub manifest: PathBuf,

    /// Output path for the layout file
    #[arg(required = true)]
    pub layout: PathBuf,

    /// Output path for the atlas image
    #[arg(required = true)]
    pub atlas: PathBuf,

    /// Sort override: 0 disables height sorting, any other value keeps
    /// the default for the manifest's type
    pub sort: Option<i64>,

    /// Maximum atlas width in pixels
    pub width: Option<u32>,
}

pub fn run(args: PackArgs) -> Result<()> {
    let printer = Printer::new();

    let mut manifest = Manifest::load(&args.manifest)?;
    let max_width = args.width.unwrap_or(DEFAULT_MAX_WIDTH);
    // The override can only disable sorting; anim manifests never sort.
    let sort = manifest.kind.sorts_by_default() && args.sort != Some(0);

    let src_dir = args
        .manifest
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_path_buf();

    printer.status(
        "Loading",
        &format!(
            "{} from {}",
            plural(manifest.sprites.len(), "sprite", "sprites"),
            display_path(&src_dir)
        ),
    );
    let frames = match manifest.kind {
        AssetKind::Anim => Some(manifest.frames.as_mut_slice()),
        _ => None,
    };
    let images = atlas::load_sprites(&mut manifest.sprites, frames, &src_dir)?;

    printer.status(
        "Packing",
        &format!(
            "shelf rows up to {}px wide{}",
            max_width,
            if sort { ", shortest sprites first" } else { "" }
        ),
    );
    let objects = match manifest.kind {
        AssetKind::Tile => Some(manifest.objects.as_mut_slice()),
        _ => None,
    };
    let packed = atlas::pack(&mut manifest.sprites, objects, max_width, sort)?;
    let width = atlas::atlas_width(packed, max_width);

    printer.status("Writing", &format!("{}x{} atlas", width, packed.height));
    let image = atlas::compose(&manifest.sprites, &images, width, packed.height);
    atlas::write_atlas(&image, &args.atlas)?;
    atlas::write_layout(&manifest, &args.layout)?;

    printer.success(
        "Finished",
        &format!(
            "{} -> {} + {}",
            plural(manifest.sprites.len(), "sprite", "sprites"),
            display_path(&args.atlas),
            display_path(&args.layout)
        ),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn solid_png(dir: &Path, id: u32, w: u32, h: u32, rgba: [u8; 4]) {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
            .save(dir.join(format!("{}.png", id)))
            .unwrap();
    }

    fn pack_args(dir: &Path, sort: Option<i64>, width: Option<u32>) -> PackArgs {
        PackArgs {
            manifest: dir.join("manifest.json"),
            layout: dir.join("out.data"),
            atlas: dir.join("out.png"),
            sort,
            width,
        }
    }

    #[test]
    fn test_pack_sheet_unsorted() {
        let dir = tempdir().unwrap();
        solid_png(dir.path(), 0, 10, 10, [255, 0, 0, 255]);
        solid_png(dir.path(), 1, 20, 5, [0, 255, 0, 255]);
        solid_png(dir.path(), 2, 15, 8, [0, 0, 255, 255]);
        fs::write(
            dir.path().join("manifest.json"),
            r#"{
                "type": "sheet",
                "images": [
                    {"id": 0, "width": 10, "height": 10},
                    {"id": 1, "width": 20, "height": 5},
                    {"id": 2, "width": 15, "height": 8}
                ]
            }"#,
        )
        .unwrap();

        run(pack_args(dir.path(), Some(0), Some(40))).unwrap();

        let layout = fs::read_to_string(dir.path().join("out.data")).unwrap();
        assert_eq!(
            layout,
            "[images]\n\
             #id,posx,posy,width,height\n\
             0,0,0,10,10\n\
             1,11,0,20,5\n\
             2,0,11,15,8\n"
        );

        // Used width 32 is more than half of 40, so no halving
        let atlas = image::open(dir.path().join("out.png")).unwrap().to_rgba8();
        assert_eq!(atlas.dimensions(), (40, 19));
        assert_eq!(atlas.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(atlas.get_pixel(11, 0).0, [0, 255, 0, 255]);
        assert_eq!(atlas.get_pixel(0, 11).0, [0, 0, 255, 255]);
        // Gutter between the first two sprites
        assert_eq!(atlas.get_pixel(10, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_pack_sheet_sorts_by_default() {
        let dir = tempdir().unwrap();
        solid_png(dir.path(), 0, 10, 10, [255, 0, 0, 255]);
        solid_png(dir.path(), 1, 20, 5, [0, 255, 0, 255]);
        fs::write(
            dir.path().join("manifest.json"),
            r#"{
                "type": "sheet",
                "images": [
                    {"id": 0, "width": 10, "height": 10},
                    {"id": 1, "width": 20, "height": 5}
                ]
            }"#,
        )
        .unwrap();

        run(pack_args(dir.path(), None, Some(64))).unwrap();

        // The shorter sprite 1 packs first
        let layout = fs::read_to_string(dir.path().join("out.data")).unwrap();
        assert!(layout.contains("\n0,21,0,10,10\n"));
        assert!(layout.contains("\n1,0,0,20,5\n"));
    }

    #[test]
    fn test_pack_halves_atlas_width() {
        let dir = tempdir().unwrap();
        solid_png(dir.path(), 0, 10, 10, [9, 9, 9, 255]);
        fs::write(
            dir.path().join("manifest.json"),
            r#"{"type": "sheet", "images": [{"id": 0, "width": 10, "height": 10}]}"#,
        )
        .unwrap();

        run(pack_args(dir.path(), None, Some(64))).unwrap();

        // Used width 11 fits into 32, so the allocation halves
        let atlas = image::open(dir.path().join("out.png")).unwrap().to_rgba8();
        assert_eq!(atlas.dimensions(), (32, 10));
    }

    #[test]
    fn test_pack_anim_trims_and_ignores_sort_flag() {
        let dir = tempdir().unwrap();

        // Sprite 0: 8x8 with a 3x2 visible block at (2,3)
        let mut img = RgbaImage::new(8, 8);
        for y in 3..5 {
            for x in 2..5 {
                img.put_pixel(x, y, Rgba([255, 0, 255, 255]));
            }
        }
        img.save(dir.path().join("0.png")).unwrap();
        solid_png(dir.path(), 1, 8, 8, [0, 255, 255, 255]);

        fs::write(
            dir.path().join("manifest.json"),
            r#"{
                "type": "anim",
                "images": [{"id": 0}, {"id": 1}],
                "data": [
                    {"id": 0, "center": {"x": 4, "y": 4}},
                    {"id": 1, "center": {"x": 4, "y": 4}}
                ]
            }"#,
        )
        .unwrap();

        // A nonzero sort value must not turn sorting on for anim
        run(pack_args(dir.path(), Some(1), Some(16))).unwrap();

        let layout = fs::read_to_string(dir.path().join("out.data")).unwrap();
        assert_eq!(
            layout,
            "[images]\n\
             #id,posx,posy,width,height\n\
             0,0,0,3,2\n\
             1,4,0,8,8\n\
             \n\
             [animation]\n\
             #frame,pivot_x,pivot_y\n\
             0,2,1\n\
             1,4,4\n"
        );

        // Used width 13 is more than half of 16, so no halving
        let atlas = image::open(dir.path().join("out.png")).unwrap().to_rgba8();
        assert_eq!(atlas.dimensions(), (16, 8));
        // Trimmed window starts at the visible block, not the image origin
        assert_eq!(atlas.get_pixel(0, 0).0, [255, 0, 255, 255]);
        assert_eq!(atlas.get_pixel(4, 0).0, [0, 255, 255, 255]);
    }

    #[test]
    fn test_pack_tile_translates_parts() {
        let dir = tempdir().unwrap();
        solid_png(dir.path(), 0, 17, 4, [10, 10, 10, 255]);
        solid_png(dir.path(), 1, 4, 4, [20, 20, 20, 255]);
        solid_png(dir.path(), 2, 16, 16, [30, 30, 30, 255]);
        fs::write(
            dir.path().join("manifest.json"),
            r#"{
                "type": "tile",
                "images": [
                    {"id": 0, "width": 17, "height": 4},
                    {"id": 1, "width": 4, "height": 4},
                    {"id": 2, "width": 16, "height": 16}
                ],
                "data": [
                    {"id": 0, "part_count": 1, "parts": [
                        {"x": 0, "y": 0, "rect": {"x": 0, "y": 0, "width": 17, "height": 4}}
                    ]},
                    {"id": 1, "part_count": 1, "parts": [
                        {"x": 0, "y": 0, "rect": {"x": 0, "y": 0, "width": 4, "height": 4}}
                    ]},
                    {"id": 2, "part_count": 2, "parts": [
                        {"x": 0, "y": 0, "rect": {"x": 0, "y": 0, "width": 8, "height": 8}},
                        {"x": 8, "y": 0, "rect": {"x": 8, "y": 0, "width": 8, "height": 8}}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        // Width 22: sprite 1 wraps to a second row, sprite 2 lands at (5,5)
        run(pack_args(dir.path(), Some(0), Some(22))).unwrap();

        let layout = fs::read_to_string(dir.path().join("out.data")).unwrap();
        assert_eq!(
            layout,
            "[images]\n\
             #id,posx,posy,width,height\n\
             0,0,0,17,4\n\
             1,0,5,4,4\n\
             2,5,5,16,16\n\
             \n\
             [objects]\n\
             #id,tile_start,tiles\n\
             0,0,1\n\
             1,1,1\n\
             2,2,2\n\
             \n\
             [tiles]\n\
             #objid,x,y,posx,posy,width,height\n\
             0,0,0,0,0,17,4\n\
             1,0,0,0,5,4,4\n\
             2,0,0,5,5,8,8\n\
             2,8,0,13,5,8,8\n"
        );
    }

    #[test]
    fn test_pack_overflow_leaves_no_output_files() {
        let dir = tempdir().unwrap();
        solid_png(dir.path(), 0, 10, 10, [1, 2, 3, 255]);
        fs::write(
            dir.path().join("manifest.json"),
            r#"{"type": "sheet", "images": [{"id": 0, "width": 10, "height": 10}]}"#,
        )
        .unwrap();

        let err = run(pack_args(dir.path(), None, Some(8))).unwrap_err();
        assert!(err.to_string().contains("texture width too small"));
        assert!(!dir.path().join("out.data").exists());
        assert!(!dir.path().join("out.png").exists());
    }

    #[test]
    fn test_pack_missing_sprite_file_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("manifest.json"),
            r#"{"type": "sheet", "images": [{"id": 0, "width": 4, "height": 4}]}"#,
        )
        .unwrap();

        assert!(run(pack_args(dir.path(), None, None)).is_err());
        assert!(!dir.path().join("out.png").exists());
    }
}
