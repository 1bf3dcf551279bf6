//! Shared pipeline helpers for CLI commands.
//!
//! Reading and parsing circuit files, rendering diagnostics, parsing
//! `PIN=TARGET` directives, locating `fir.toml`, and writing results.

use std::path::{Path, PathBuf};

use fir_check::CheckEngine;
use fir_config::{CheckConfig, ProjectConfig};
use fir_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, JsonRenderer, Severity, TerminalRenderer,
};
use fir_ir::{Annotation, Circuit, SinkAnnotation, Target};

use crate::{GlobalArgs, ReportFormat};

/// A circuit file read from disk.
pub struct SourceText {
    /// The file name used in diagnostics.
    pub file: String,
    /// The file contents.
    pub text: String,
}

impl SourceText {
    /// Reads `path`.
    pub fn read(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read '{}': {e}", path.display()))?;
        Ok(Self {
            file: path.display().to_string(),
            text,
        })
    }

    /// Parses the text, reporting problems to `sink`.
    pub fn parse(&self, sink: &DiagnosticSink) -> Option<Circuit> {
        log::debug!("parsing {}", self.file);
        fir_parser::parse_circuit(&self.text, &self.file, sink)
    }
}

/// Parses and validates a circuit file.
///
/// Validation runs only on a cleanly parsed circuit. The circuit is returned
/// only if no error was found; warnings are returned either way.
pub fn parse_and_check(
    src: &SourceText,
    config: &CheckConfig,
) -> (Option<Circuit>, Vec<Diagnostic>) {
    let sink = DiagnosticSink::new();
    let circuit = src.parse(&sink).filter(|_| !sink.has_errors());
    if let Some(ref c) = circuit {
        CheckEngine::new(config).run(c, &sink);
    }
    let diagnostics = sink.take_all();
    let circuit = circuit.filter(|_| !has_errors(&diagnostics));
    (circuit, diagnostics)
}

/// Renders diagnostics to standard error (text) or standard output (JSON).
pub fn report(
    diagnostics: &[Diagnostic],
    source: Option<&SourceText>,
    format: ReportFormat,
    global: &GlobalArgs,
) {
    match format {
        ReportFormat::Text => {
            let mut renderer = TerminalRenderer::new(global.color);
            if let Some(src) = source {
                renderer = renderer.with_source(src.file.clone(), src.text.clone());
            }
            for diag in diagnostics {
                if global.quiet && !diag.severity.is_error() {
                    continue;
                }
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            for diag in diagnostics {
                println!("{}", JsonRenderer.render(diag));
            }
        }
    }
}

/// Prints the `N error(s), M warning(s)` line unless quiet.
pub fn summarize(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    if global.quiet {
        return;
    }
    let count = |s: Severity| diagnostics.iter().filter(|d| d.severity == s).count();
    eprintln!(
        "   Result: {} error(s), {} warning(s)",
        count(Severity::Error),
        count(Severity::Warning)
    );
}

/// Returns `true` if any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity.is_error())
}

/// Combines `fir.toml` rule overrides with `--allow`/`--deny` flags.
///
/// A flag wins over the config: a rule allowed on the command line is removed
/// from the denied set and vice versa.
pub fn merge_check_config(base: &CheckConfig, allow: &[String], deny: &[String]) -> CheckConfig {
    let mut merged = base.clone();
    for rule in deny {
        merged.allow.retain(|r| r != rule);
        if !merged.deny.contains(rule) {
            merged.deny.push(rule.clone());
        }
    }
    for rule in allow {
        merged.deny.retain(|r| r != rule);
        if !merged.allow.contains(rule) {
            merged.allow.push(rule.clone());
        }
    }
    merged
}

fn split_directive(directive: &str) -> Result<(&str, &str), String> {
    match directive.split_once('=') {
        Some((pin, target)) if !pin.trim().is_empty() => Ok((pin.trim(), target.trim())),
        _ => Err(format!("expected PIN=TARGET, found '{directive}'")),
    }
}

/// Parses a `--source PIN=Module>component` flag.
pub fn parse_source_directive(directive: &str) -> Result<Annotation, Box<dyn std::error::Error>> {
    let (pin, target) = split_directive(directive)?;
    let target: Target = target.parse()?;
    Ok(Annotation::Source(fir_wiring::source_from_target(target, pin)?))
}

/// Parses a `--sink PIN=TARGET` flag.
pub fn parse_sink_directive(directive: &str) -> Result<Annotation, Box<dyn std::error::Error>> {
    let (pin, target) = split_directive(directive)?;
    Ok(Annotation::Sink(SinkAnnotation::new(target.parse()?, pin)))
}

/// Walks up from `start` looking for the nearest directory containing `fir.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(fir_config::CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {} in {} or any parent directory",
                fir_config::CONFIG_FILE,
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project directory from global CLI args.
///
/// `--config` may name the file or its directory. Otherwise the current
/// directory and its parents are searched.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Loads `fir.toml` for commands that work without a project.
///
/// An explicit `--config` must load. Otherwise a missing file is not an error.
pub fn optional_config(
    global: &GlobalArgs,
) -> Result<Option<ProjectConfig>, Box<dyn std::error::Error>> {
    if global.config.is_some() {
        let dir = resolve_project_root(global)?;
        return Ok(Some(fir_config::load_config(&dir)?));
    }
    match find_project_root(&std::env::current_dir()?) {
        Ok(dir) => Ok(Some(fir_config::load_config(&dir)?)),
        Err(_) => Ok(None),
    }
}

/// Writes `text` to `output`, or to standard output if there is none.
///
/// Missing parent directories are created.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)
                .map_err(|e| format!("cannot write '{}': {e}", path.display()).into())
        }
    }
}
