//! Mosaic CLI — the command-line driver for the placement engine.
//!
//! Reads a placement problem from the text input format, runs the
//! three-stage pipeline (anneal → legalize → detail place), renders any
//! diagnostics, and writes the result as JSON for downstream
//! visualization.

#![warn(missing_docs)]

mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use mosaic_diagnostics::{
    Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity, TerminalRenderer,
};
use mosaic_place::place_design;

use config::MosaicConfig;

/// Mosaic — a simulated-annealing cell placement engine.
#[derive(Parser, Debug)]
#[command(name = "mosaic", version, about = "Mosaic cell placement engine")]
pub struct Cli {
    /// Input placement description (text format).
    #[arg(default_value = "input.txt")]
    pub input: PathBuf,

    /// Output JSON path.
    #[arg(default_value = "placement.json")]
    pub output: PathBuf,

    /// RNG seed for the annealer and detail placer (default: nondeterministic).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum annealing epochs (overrides the config file).
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Path to a custom `mosaic.toml` configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Also show note-level diagnostics (annealing progress, skipped records).
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Runs the placement pipeline. Returns the process exit code.
fn run(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    let renderer = TerminalRenderer::new(color);
    let sink = DiagnosticSink::new();

    let mut pl = mosaic_io::read_placement(&cli.input, &sink)?;

    if pl.cells.is_empty() {
        sink.emit(
            Diagnostic::error(
                DiagnosticCode::new(Category::Error, 1),
                format!("no cells loaded from {}", cli.input.display()),
            )
            .with_help("check the input file format"),
        );
        render_diagnostics(&sink, &renderer, cli.verbose);
        return Ok(1);
    }

    if !cli.quiet {
        eprintln!(
            "   Loaded {} cells, {} nets on a {}x{} grid",
            pl.cell_count(),
            pl.net_count(),
            pl.grid.width,
            pl.grid.height
        );
    }

    let file_config = MosaicConfig::load(cli.config.as_deref())?;
    let mut place_config = file_config.to_place_config();
    if let Some(seed) = cli.seed {
        place_config.anneal.seed = Some(seed);
        place_config.detail.seed = Some(seed);
    }
    if let Some(epochs) = cli.epochs {
        place_config.anneal.max_epochs = epochs;
    }

    let summary = place_design(&mut pl, &place_config, &sink)?;

    if !cli.quiet {
        eprintln!(
            "   Annealed: cost {:.2} -> {:.2} in {} epochs",
            summary.initial_cost, summary.after_anneal_cost, summary.epochs_run
        );
        eprintln!(
            "   Legalized {} of {} movable cells: cost {:.2}",
            summary.legalized_cells,
            pl.movable_indices().len(),
            summary.after_legalize_cost
        );
        eprintln!(
            "   Detail placement: cost {:.2} -> {:.2}",
            summary.after_legalize_cost, summary.final_cost
        );
    }

    render_diagnostics(&sink, &renderer, cli.verbose);

    mosaic_io::write_placement(&pl, &cli.output)?;
    if !cli.quiet {
        eprintln!("   Placement written to {}", cli.output.display());
    }

    Ok(0)
}

/// Renders accumulated diagnostics to stderr.
///
/// Warnings and errors are always shown; notes only with `--verbose`.
fn render_diagnostics(sink: &DiagnosticSink, renderer: &TerminalRenderer, verbose: bool) {
    for diag in sink.diagnostics() {
        if diag.severity >= Severity::Warning || verbose {
            eprint!("{}", renderer.render(&diag));
        }
    }
}

/// Rough terminal detection — checks if stderr plausibly is a terminal.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}
