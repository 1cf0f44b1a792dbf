use clap::Parser;

/// Classifies every execution path in a shapecheck constraint document.
///
/// # Examples
///
/// ```bash
/// shapecheck constraints.json
/// shapecheck constraints.json --timeout 10
/// shapecheck constraints.json --silent
/// ```
#[derive(Parser, Debug)]
#[command(name = "shapecheck")]
#[command(about = "Classify tensor-shape constraint paths", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the JSON constraint document emitted by the front end.
    pub path: std::path::PathBuf,

    /// Suppress per-path narrative output; print only the closing summary.
    #[arg(long)]
    pub silent: bool,

    /// Per-path classification budget, in seconds.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}
