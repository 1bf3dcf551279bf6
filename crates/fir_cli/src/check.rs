//! `firc check`: parse and validate a circuit file.

use std::path::Path;

use crate::pipeline::{self, SourceText};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `firc check` command.
///
/// Rule overrides from `fir.toml`, if one is found, are merged with the
/// command-line flags. Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let src = SourceText::read(Path::new(&args.file))?;
    let base = pipeline::optional_config(global)?
        .map(|c| c.check)
        .unwrap_or_default();
    let config = pipeline::merge_check_config(&base, &args.allow, &args.deny);

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking {}", src.file);
    }

    let (circuit, diagnostics) = pipeline::parse_and_check(&src, &config);
    pipeline::report(&diagnostics, Some(&src), args.format, global);
    if args.format == ReportFormat::Text {
        pipeline::summarize(&diagnostics, global);
    }

    Ok(if circuit.is_some() { 0 } else { 1 })
}
