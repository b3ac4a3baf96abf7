//! Runs the external formatter and separates the reformatted document from
//! its diagnostic report.

use std::io::ErrorKind;
use std::io::Write;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;

use anyhow::Context;
use anyhow::bail;
use tracing::debug;

use crate::split::split_combined;

pub(crate) struct FormatterOutput {
    /// The reformatted document text.
    pub formatted: String,
    /// Report text the formatter produced alongside a successful run.
    pub diagnostics: Option<String>,
}

/// Run `argv`, feeding `input` on stdin and capturing both output streams.
///
/// A non-zero exit or non-UTF-8 output is an error carrying whatever report
/// text the formatter produced. On success, stdout is the reformatted
/// document (after peeling off an inline report when `combined_output` is
/// set) and any remaining report text is returned as diagnostics.
pub(crate) fn run_formatter(
    argv: &[String],
    input: &str,
    combined_output: bool,
) -> anyhow::Result<FormatterOutput> {
    let (program, args) = argv.split_first().context("formatter command is empty")?;
    debug!("running formatter {program} {args:?}");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn formatter `{program}`"))?;
    let mut stdin = child
        .stdin
        .take()
        .context("formatter stdin was not captured")?;

    // Feed the document from its own thread so a formatter that emits output
    // before draining stdin cannot deadlock both pipes.
    let output: Output = std::thread::scope(|scope| {
        let feeder = scope.spawn(move || stdin.write_all(input.as_bytes()));
        let output = child
            .wait_with_output()
            .context("failed to collect formatter output");
        match feeder.join() {
            Ok(Ok(())) => {}
            // A formatter may legitimately exit without reading all of its
            // input; the resulting broken pipe is not our error.
            Ok(Err(err)) if err.kind() == ErrorKind::BrokenPipe => {}
            Ok(Err(err)) => {
                return Err(err).context("failed to feed the document to the formatter");
            }
            Err(_) => bail!("stdin feeder thread panicked"),
        }
        output
    })?;

    let stdout = String::from_utf8(output.stdout).context("formatter stdout was not UTF-8")?;
    let stderr = String::from_utf8(output.stderr).context("formatter stderr was not UTF-8")?;

    let (formatted, inline_report) = if combined_output {
        split_combined(&stdout)
    } else {
        (stdout.as_str(), None)
    };

    let mut diagnostics = String::new();
    if let Some(report) = inline_report {
        diagnostics.push_str(report);
    }
    diagnostics.push_str(&stderr);

    if !output.status.success() {
        bail!("formatter `{program}` failed ({}):\n{diagnostics}", output.status);
    }

    let formatted = formatted.to_string();
    let diagnostics = (!diagnostics.is_empty()).then_some(diagnostics);
    Ok(FormatterOutput {
        formatted,
        diagnostics,
    })
}
