//! `firc wire`: run the wiring pass with annotations from a file or flags.

use std::path::Path;

use fir_ir::{Annotation, Circuit, CircuitState, Transform};
use fir_wiring::{WiringError, WiringTransform};

use crate::pipeline::{self, SourceText};
use crate::{GlobalArgs, ReportFormat, WireArgs};

/// Collects the annotations named by `--annotations`, `--source` and `--sink`.
///
/// File annotations come first, then sources, then sinks.
pub fn collect_annotations(args: &WireArgs) -> Result<Vec<Annotation>, Box<dyn std::error::Error>> {
    let mut annotations = match args.annotations {
        Some(ref path) => fir_config::load_annotations(Path::new(path))?,
        None => Vec::new(),
    };
    for directive in &args.source {
        annotations.push(pipeline::parse_source_directive(directive)?);
    }
    for directive in &args.sink {
        annotations.push(pipeline::parse_sink_directive(directive)?);
    }
    Ok(annotations)
}

/// Runs the wiring pass and returns the rewritten circuit.
pub fn apply_wiring(circuit: Circuit, annotations: Vec<Annotation>) -> Result<Circuit, WiringError> {
    let transform = WiringTransform::new();
    log::info!(
        "running {} with {} annotations",
        transform.name(),
        annotations.len()
    );
    let state = transform.execute(&CircuitState::new(circuit, annotations))?;
    Ok(state.circuit)
}

/// Runs the `firc wire` command.
///
/// The circuit must pass validation before it is wired.
pub fn run(args: &WireArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let annotations = collect_annotations(args)?;
    let src = SourceText::read(Path::new(&args.file))?;
    let check = pipeline::optional_config(global)?
        .map(|c| c.check)
        .unwrap_or_default();

    let (circuit, diagnostics) = pipeline::parse_and_check(&src, &check);
    pipeline::report(&diagnostics, Some(&src), ReportFormat::Text, global);
    let Some(circuit) = circuit else {
        pipeline::summarize(&diagnostics, global);
        return Ok(1);
    };

    let wired = apply_wiring(circuit, annotations)?;
    pipeline::write_output(&wired.to_string(), args.output.as_deref().map(Path::new))?;
    Ok(0)
}
