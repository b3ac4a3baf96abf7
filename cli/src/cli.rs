use std::path::PathBuf;

use clap::Parser;

/// Reformat a file by patching it with a formatter's output.
///
/// The formatter command receives the document on stdin and writes the
/// reformatted text to stdout. Only the line ranges the formatter changed
/// are rewritten, so anything tracking the document by line survives.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Rewrite FILE in place instead of printing the patched document to
    /// stdout.
    #[arg(long = "write", short = 'w', default_value_t = false)]
    pub write: bool,

    /// The formatter multiplexes its report onto stdout behind a delimiter
    /// line of `=` characters; split it off before patching.
    #[arg(long = "combined-output", default_value_t = false)]
    pub combined_output: bool,

    /// File to reformat.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Formatter command, e.g. `patchfmt -w main.go -- gofmt`.
    #[arg(trailing_var_arg = true, required = true, value_name = "FORMATTER")]
    pub formatter: Vec<String>,
}
