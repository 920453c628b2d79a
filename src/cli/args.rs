//! Command-line interface definitions.

use crate::config::{Converter, RasterFormat};
use crate::icon::IconSizeSet;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rasterize SVG icons into square raster icons
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: icongen.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "icongen.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Icon directory (relative to the current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Comma-separated icon sizes, e.g. `72,96,192`
    #[arg(short, long, global = true)]
    pub sizes: Option<IconSizeSet>,

    /// Output format (png, jpg, webp)
    #[arg(short, long, global = true)]
    pub format: Option<RasterFormat>,

    /// Conversion backend (builtin, magick, ffmpeg)
    #[arg(long, global = true)]
    pub converter: Option<Converter>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands (default: build)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rasterize every configured size
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Verify that every source icon exists and parses, without writing
    #[command(visible_alias = "c")]
    Check,
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Write nothing unless every size converts successfully
    #[arg(short, long)]
    pub atomic: bool,
}

impl Cli {
    /// Resolved subcommand; a bare invocation runs the build.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Build {
            build_args: BuildArgs::default(),
        })
    }
}
