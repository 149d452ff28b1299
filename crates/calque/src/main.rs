//! # calque
//!
//! Calque - Puts type-checker results back where they belong in a template
//! document.
//!
//! ## Name Origin
//!
//! A **calque** is a loan translation: a phrase carried into another language
//! piece by piece while keeping its original shape. Template documents go
//! through the same thing on their way to the type checker, and this tool
//! carries the checker's answers back.

mod commands;
mod config;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calque")]
#[command(about = "Remap type-checker results onto template documents", long_about = None)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long, action = clap::ArgAction::Version)]
    version: (),
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map recorded errors and quick-info onto a document
    #[command(visible_alias = "canon")]
    Remap(commands::remap::RemapArgs),

    /// Show the line alignment between two texts
    Align(commands::align::AlignArgs),

    /// Print the JSON Schema for calque.config.json
    Schema,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Remap(args) => commands::remap::run(args),
        Commands::Align(args) => commands::align::run(args),
        Commands::Schema => println!("{}", config::CALQUE_CONFIG_SCHEMA),
    }
}
