//! Atlas manifest (JSON) parsing.
//!
//! A manifest names the sprites to pack and carries a `type` tag deciding
//! how the `data` table is read: `"tile"` pairs every sprite with a tile
//! object, `"anim"` pairs it with an animation frame, and anything else is a
//! plain sprite sheet with no side table.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AtlasError, Result};

/// Asset kind declared by the manifest `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Tile,
    Anim,
    Sheet,
}

impl AssetKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "tile" => AssetKind::Tile,
            "anim" => AssetKind::Anim,
            _ => AssetKind::Sheet,
        }
    }

    /// Whether this kind packs shortest-sprite-first by default.
    ///
    /// Animation frames never sort: frame order carries meaning for the
    /// renderer, so their packing order must match the manifest.
    pub fn sorts_by_default(self) -> bool {
        !matches!(self, AssetKind::Anim)
    }
}

/// One sprite to pack.
///
/// `width`/`height` come from the manifest except in anim mode, where the
/// loader measures them from the trimmed image. The remaining fields are
/// filled in as the sprite moves through the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct Sprite {
    pub id: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Trim offset into the source image, zero unless trimming.
    #[serde(skip)]
    pub xoffset: u32,
    #[serde(skip)]
    pub yoffset: u32,
    /// Atlas placement, assigned by the packer.
    #[serde(skip)]
    pub x: u32,
    #[serde(skip)]
    pub y: u32,
}

impl Sprite {
    /// Sprite with known dimensions and no trim or placement yet.
    pub fn new(id: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            xoffset: 0,
            yoffset: 0,
            x: 0,
            y: 0,
        }
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One sub-rectangle of a tile object, addressed by its tile-grid cell.
///
/// `rect` starts in sprite-local coordinates and is translated to atlas
/// coordinates when the owning sprite is placed.
#[derive(Debug, Clone, Deserialize)]
pub struct TilePart {
    pub x: i32,
    pub y: i32,
    pub rect: Rect,
}

/// A composite sprite assembled from parts of one packed sprite.
#[derive(Debug, Clone, Deserialize)]
pub struct TileObject {
    pub id: u32,
    pub part_count: u32,
    pub parts: Vec<TilePart>,
}

/// Pixel position, signed so trim-adjusted pivots can go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

/// An animation frame and its pivot point.
///
/// The pivot starts in source pixel coordinates; the loader re-expresses it
/// relative to the trimmed top-left corner.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimFrame {
    pub id: u32,
    pub center: Pos,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(rename = "type")]
    kind: String,
    images: Vec<Sprite>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// A validated packing job: the sprite list plus whichever side table the
/// asset kind calls for. Unused tables stay empty.
#[derive(Debug)]
pub struct Manifest {
    pub kind: AssetKind,
    pub sprites: Vec<Sprite>,
    pub objects: Vec<TileObject>,
    pub frames: Vec<AnimFrame>,
}

impl Manifest {
    /// Load and validate a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AtlasError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse and validate a manifest from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(content).map_err(|e| AtlasError::Manifest {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check the manifest JSON syntax".to_string()),
        })?;

        let kind = AssetKind::from_tag(&raw.kind);

        // Sprite ids double as lookup keys into the side tables and into
        // the loaded image list, so they must be dense and in order.
        for (index, sprite) in raw.images.iter().enumerate() {
            if sprite.id != index as u32 {
                return Err(AtlasError::Manifest {
                    message: format!(
                        "sprite ids must be contiguous from 0: expected id {} at position {}, got {}",
                        index, index, sprite.id
                    ),
                    help: Some("Renumber the images array so ids match their positions".to_string()),
                });
            }
        }

        if kind != AssetKind::Anim {
            for sprite in &raw.images {
                if sprite.width == 0 || sprite.height == 0 {
                    return Err(AtlasError::Manifest {
                        message: format!("sprite {} has no width/height", sprite.id),
                        help: Some(
                            "Dimensions are required unless type is \"anim\", where they are measured from the image".to_string(),
                        ),
                    });
                }
            }
        }

        let mut objects: Vec<TileObject> = Vec::new();
        let mut frames: Vec<AnimFrame> = Vec::new();

        match kind {
            AssetKind::Tile => {
                let data = raw.data.ok_or_else(|| AtlasError::Manifest {
                    message: "tile manifest has no data table".to_string(),
                    help: Some("Add a data array of tile objects".to_string()),
                })?;
                objects = serde_json::from_value(data).map_err(|e| AtlasError::Manifest {
                    message: format!("Invalid tile object table: {}", e),
                    help: None,
                })?;

                for obj in &objects {
                    if obj.part_count as usize != obj.parts.len() {
                        return Err(AtlasError::Manifest {
                            message: format!(
                                "tile object {} declares {} parts but lists {}",
                                obj.id,
                                obj.part_count,
                                obj.parts.len()
                            ),
                            help: None,
                        });
                    }
                }
                check_covers_sprites(
                    objects.iter().map(|o| o.id),
                    raw.images.len(),
                    "tile object",
                )?;
            }
            AssetKind::Anim => {
                let data = raw.data.ok_or_else(|| AtlasError::Manifest {
                    message: "anim manifest has no data table".to_string(),
                    help: Some("Add a data array of animation frames".to_string()),
                })?;
                frames = serde_json::from_value(data).map_err(|e| AtlasError::Manifest {
                    message: format!("Invalid animation frame table: {}", e),
                    help: None,
                })?;
                check_covers_sprites(frames.iter().map(|f| f.id), raw.images.len(), "frame")?;
            }
            // A data table on a plain sheet is ignored.
            AssetKind::Sheet => {}
        }

        Ok(Manifest {
            kind,
            sprites: raw.images,
            objects,
            frames,
        })
    }

    /// True when the manifest carries a `data` table its kind never reads.
    pub fn has_ignored_data(content: &str) -> bool {
        serde_json::from_str::<RawManifest>(content)
            .map(|raw| AssetKind::from_tag(&raw.kind) == AssetKind::Sheet && raw.data.is_some())
            .unwrap_or(false)
    }
}

/// Every sprite id must be paired with exactly one side-table record.
fn check_covers_sprites(
    ids: impl Iterator<Item = u32>,
    sprite_count: usize,
    what: &str,
) -> Result<()> {
    let mut seen = HashSet::new();
    let mut count = 0usize;
    for id in ids {
        count += 1;
        if id as usize >= sprite_count {
            return Err(AtlasError::Manifest {
                message: format!("{} id {} does not match any sprite", what, id),
                help: None,
            });
        }
        if !seen.insert(id) {
            return Err(AtlasError::Manifest {
                message: format!("duplicate {} id {}", what, id),
                help: None,
            });
        }
    }
    if count != sprite_count {
        return Err(AtlasError::Manifest {
            message: format!(
                "{} table covers {} of {} sprites",
                what, count, sprite_count
            ),
            help: Some(format!("Every sprite needs exactly one {} entry", what)),
        });
    }
    Ok(())
}
