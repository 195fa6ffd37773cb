use clap::Parser;
use miette::Result;

use atlasc::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack(args) => atlasc::cli::pack::run(args)?,
        Commands::Validate(args) => atlasc::cli::validate::run(args)?,
        Commands::Completions(args) => atlasc::cli::completions::run(args)?,
    }

    Ok(())
}
