//! Validate command implementation.
//!
//! Parses manifests and checks that every referenced sprite image exists,
//! without producing any output files.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::{AtlasError, Result};
use crate::manifest::Manifest;
use crate::output::{display_path, plural, Printer};

/// Validate atlas manifests without packing
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest files to validate
    #[arg(required = true)]
    pub manifests: Vec<PathBuf>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let printer = Printer::new();

    for path in &args.manifests {
        let content = std::fs::read_to_string(path).map_err(|e| AtlasError::Io {
            path: path.clone(),
            message: format!("Failed to read manifest: {}", e),
        })?;
        let manifest = Manifest::parse(&content)?;

        if Manifest::has_ignored_data(&content) {
            printer.warning(
                "Warning",
                &format!(
                    "{}: data table is ignored for plain sheet manifests",
                    display_path(path)
                ),
            );
        }

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut missing = 0usize;
        for sprite in &manifest.sprites {
            let sprite_path = dir.join(format!("{}.png", sprite.id));
            if !sprite_path.exists() {
                printer.error("Missing", &display_path(&sprite_path));
                missing += 1;
            }
        }
        if missing > 0 {
            return Err(AtlasError::Manifest {
                message: format!(
                    "{} missing for {}",
                    plural(missing, "sprite image", "sprite images"),
                    display_path(path)
                ),
                help: Some("Sprite images are looked up as <manifest dir>/<id>.png".to_string()),
            });
        }

        printer.success(
            "Validated",
            &format!(
                "{} ({})",
                display_path(path),
                plural(manifest.sprites.len(), "sprite", "sprites")
            ),
        );
    }

    Ok(())
}
