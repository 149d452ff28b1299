//! Remap command - Map recorded checker results onto a template document
//!
//! Replays a fixture of rewriter and analysis engine output through the
//! pipeline and prints the surviving errors and quick-info in document
//! coordinates.

use calque_canon::{Fixture, Mapped, Pipeline, PipelineOutput};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config;

#[derive(Args)]
pub struct RemapArgs {
    /// Template document the results belong to
    pub document: PathBuf,

    /// Recorded rewriter and engine output (JSON)
    #[arg(long)]
    pub fixture: PathBuf,

    /// Config file path (default: ./calque.config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Log every dropped result and stage to stderr
    #[arg(long)]
    pub verbose: bool,
}

pub fn run(args: RemapArgs) {
    super::init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(None),
    };
    let options = config.pipeline.to_options();

    let source = super::read_text(&args.document);
    let fixture = match Fixture::load(&args.fixture) {
        Ok(fixture) => fixture,
        Err(e) => super::fail(format!(
            "Failed to load fixture {}: {}",
            args.fixture.display(),
            e
        )),
    };

    let rewriter = fixture.rewriter();
    let engine = fixture.engine();
    let services = fixture.services();
    let output = match Pipeline::new(&rewriter, &engine, &services, options).run(&source) {
        Ok(output) => output,
        Err(e) => super::fail(e),
    };

    if args.format == "json" {
        super::print_json(&output);
        return;
    }

    print_text(&args.document, &output);
    if output.has_errors() {
        std::process::exit(1);
    }
}

/// Human-readable report. Positions are printed 1-based.
fn print_text(document: &Path, output: &PipelineOutput) {
    println!("\n\x1b[4m{}\x1b[0m", document.display());

    for Mapped { item, processed } in &output.errors {
        println!(
            "  \x1b[31merror\x1b[0m TS{} at {}:{} (processed {}:{}): {}",
            item.code,
            item.line + 1,
            item.character + 1,
            processed.line + 1,
            processed.character + 1,
            item.rendered_message
        );
    }
    for Mapped { item, processed } in &output.static_quick_infos {
        println!(
            "  \x1b[36minfo\x1b[0m  {} at {}:{} (processed {}:{}): {}",
            item.target_string,
            item.line + 1,
            item.character + 1,
            processed.line + 1,
            processed.character + 1,
            item.text
        );
    }

    if !output.removed_lines.is_empty() {
        let lines: Vec<String> = output
            .removed_lines
            .iter()
            .map(|line| (line + 1).to_string())
            .collect();
        println!("  removed lines: {}", lines.join(", "));
    }

    let status = if output.has_errors() {
        "\x1b[31m✗\x1b[0m"
    } else {
        "\x1b[32m✓\x1b[0m"
    };
    println!(
        "\n{} {} error(s), {} quick info(s)",
        status,
        output.errors.len(),
        output.static_quick_infos.len()
    );
}
