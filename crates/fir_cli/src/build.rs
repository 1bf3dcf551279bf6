//! `firc build`: the project pipeline driven by `fir.toml`.
//!
//! 1. Find the project directory and load `fir.toml`
//! 2. Parse the input circuit
//! 3. Validate it with the configured rule overrides
//! 4. Run the wiring pass with inline and file annotations
//! 5. Write the result to the configured output

use fir_config::ProjectConfig;
use fir_ir::Annotation;

use crate::pipeline::{self, SourceText};
use crate::wire::apply_wiring;
use crate::{GlobalArgs, ReportFormat};

/// Gathers `[wiring]` directives and the annotation files the project lists.
///
/// Annotation file paths are relative to the project directory.
pub fn project_annotations(
    config: &ProjectConfig,
    project_dir: &std::path::Path,
) -> Result<Vec<Annotation>, Box<dyn std::error::Error>> {
    let mut annotations = config.wiring.annotations();
    for file in &config.project.annotations {
        let path = project_dir.join(file);
        log::debug!("loading annotations from {}", path.display());
        annotations.extend(fir_config::load_annotations(&path)?);
    }
    Ok(annotations)
}

/// Runs the `firc build` command.
///
/// Returns exit code 0 on success, 1 if the circuit fails to parse or
/// validate. A wiring failure is returned as an error.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = pipeline::resolve_project_root(global)?;
    let config = fir_config::load_config(&project_dir)?;

    if !global.quiet {
        eprintln!(
            "   Building {} v{}",
            config.project.name, config.project.version
        );
    }

    let src = SourceText::read(&project_dir.join(&config.project.input))?;
    let annotations = project_annotations(&config, &project_dir)?;

    let (circuit, diagnostics) = pipeline::parse_and_check(&src, &config.check);
    pipeline::report(&diagnostics, Some(&src), ReportFormat::Text, global);
    let Some(circuit) = circuit else {
        pipeline::summarize(&diagnostics, global);
        return Ok(1);
    };

    let circuit = if annotations.is_empty() {
        circuit
    } else {
        apply_wiring(circuit, annotations)?
    };

    let output = config.project.output.as_ref().map(|o| project_dir.join(o));
    pipeline::write_output(&circuit.to_string(), output.as_deref())?;
    if !global.quiet {
        if let Some(path) = output {
            eprintln!("   Wrote {}", path.display());
        }
    }
    Ok(0)
}
