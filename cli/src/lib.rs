mod cli;
mod format;
mod split;

use std::io::Write as _;
use std::path::Path;

use anyhow::Context;
pub use cli::Cli;
use patchfmt_apply::apply_hunks;
use patchfmt_apply::diff_script;
use patchfmt_apply::join_lines;
use patchfmt_apply::parse_script;
use patchfmt_apply::split_lines;
use tracing::debug;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn run_main(cli: Cli) -> anyhow::Result<()> {
    let default_level = "error";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let Cli {
        write,
        combined_output,
        file,
        formatter,
    } = cli;

    let original = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let outcome = format::run_formatter(&formatter, &original, combined_output)?;
    if let Some(diagnostics) = &outcome.diagnostics {
        // The formatter's report goes to the error channel verbatim; how a
        // caller renders it further is not the engine's concern.
        eprint!("{diagnostics}");
    }

    let mut lines = split_lines(&original);
    let formatted_lines = split_lines(&outcome.formatted);
    let script = diff_script(&lines, &formatted_lines);
    let hunks = parse_script(&script)?;
    debug!("applying {} hunk(s) to {}", hunks.len(), file.display());
    apply_hunks(&mut lines, &hunks)?;
    let patched = join_lines(&lines);

    if write {
        if hunks.is_empty() {
            info!("{} is already formatted", file.display());
        } else {
            write_in_place(&file, &patched)?;
        }
    } else {
        print!("{patched}");
    }
    Ok(())
}

/// Replace `path` with `contents` via a temporary file in the same
/// directory, so a crash mid-write cannot leave a half-formatted document.
fn write_in_place(path: &Path, contents: &str) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .permissions();
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create a temporary file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .context("failed to write the patched document")?;
    tmp.as_file()
        .set_permissions(permissions)
        .context("failed to carry over file permissions")?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
