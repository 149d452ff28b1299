//! Align command - Show which lines of one text survive in another

use calque_canon::{align, AlignmentMap};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct AlignArgs {
    /// Text before lines were removed
    pub before: PathBuf,

    /// Text after lines were removed
    pub after: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// JSON output structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput {
    removed_lines: Vec<u32>,
    /// Indexed by `after` line.
    after_to_before: Vec<Option<u32>>,
    /// Indexed by `before` line.
    before_to_after: Vec<Option<u32>>,
}

impl From<&AlignmentMap> for JsonOutput {
    fn from(map: &AlignmentMap) -> Self {
        Self {
            removed_lines: map.removed_lines().to_vec(),
            after_to_before: (0..map.generated_line_count() as u32)
                .map(|line| map.generated_to_original(line))
                .collect(),
            before_to_after: (0..map.original_line_count() as u32)
                .map(|line| map.original_to_generated(line))
                .collect(),
        }
    }
}

pub fn run(args: AlignArgs) {
    super::init_logging(false);

    let before = super::read_text(&args.before);
    let after = super::read_text(&args.after);
    let map = align(&before, &after);

    if args.format == "json" {
        super::print_json(&JsonOutput::from(&map));
        return;
    }

    for line in 0..map.original_line_count() as u32 {
        match map.original_to_generated(line) {
            Some(to) => println!("  {:>5} -> {}", line, to),
            None => println!("  {:>5} \x1b[33mremoved\x1b[0m", line),
        }
    }
    println!(
        "\n{} of {} lines kept, {} removed",
        map.matched_count(),
        map.original_line_count(),
        map.removed_lines().len()
    );
}
