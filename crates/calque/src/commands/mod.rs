pub mod align;
pub mod remap;

use std::fmt::Display;
use std::path::Path;

use tracing::Level;

/// Install the stderr log subscriber.
pub(crate) fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Print `message` as an error and exit with status 1.
pub(crate) fn fail(message: impl Display) -> ! {
    eprintln!("\x1b[31mError:\x1b[0m {}", message);
    std::process::exit(1);
}

pub(crate) fn read_text(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => fail(format!("Failed to read {}: {}", path.display(), e)),
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("Failed to serialize output: {}", e)),
    }
}
