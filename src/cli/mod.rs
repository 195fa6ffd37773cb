pub mod completions;
pub mod pack;
pub mod validate;

use clap::{Parser, Subcommand};

/// atlasc - Sprite atlas packer
#[derive(Parser, Debug)]
#[command(name = "atlasc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack sprites into a texture atlas and a layout file
    Pack(pack::PackArgs),

    /// Validate atlas manifests without packing
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
