//! icongen - Rasterize SVG icons into fixed-size square raster icons.

mod cli;
mod config;
mod icon;
mod image;
mod logger;
mod rasterizer;
mod utils;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_icons, check::check_icons};
use config::IconGenConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = IconGenConfig::load(cli)?;

    match cli.command() {
        Commands::Build { .. } => build_icons(&config),
        Commands::Check => check_icons(&config),
    }
}

/// Print the error and its cause chain as one block.
fn report_error(err: &anyhow::Error) {
    let detail = err
        .chain()
        .skip(1)
        .map(|cause| format!("  caused by: {cause}"))
        .collect::<Vec<_>>()
        .join("\n");
    logger::error_block(&err.to_string(), &detail);
}
