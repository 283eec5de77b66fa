//! catrefine CLI: category-set closure over a triple relation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use catrefine::config::Config;
use catrefine::engine::{Closure, Engine};
use catrefine::error::{CatError, EngineError};
use catrefine::export::{self, OutputFormat};
use catrefine::input::InputDocument;
use catrefine::policy::OrphanListExemption;
use catrefine::verify;

#[derive(Parser)]
#[command(
    name = "catrefine",
    version,
    about = "Refine symbol category sets to a fixpoint over a triple relation"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the closure and emit sets and rules.
    Run {
        /// Input file (`-` or omitted for stdin).
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output file (stdout when omitted).
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output notation (overrides the config file).
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Re-check the finished closure before writing it.
        #[arg(long)]
        verify: bool,
    },

    /// Compute the closure and print run statistics.
    Stats {
        /// Input file (`-` or omitted for stdin).
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Load and resolve the input without computing the closure.
    Check {
        /// Input file (`-` or omitted for stdin).
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Run {
            input,
            output,
            format,
            verify,
        } => {
            let closure = load(&config, input.as_deref())?.run()?;
            if verify {
                check_closure(&closure)?;
            }

            let format = format.unwrap_or(config.output.format);
            match output {
                Some(path) => {
                    export::write_closure_file(&closure, format, &path)
                        .map_err(CatError::from)?;
                    tracing::info!(path = %path.display(), ?format, "wrote closure");
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut out = stdout.lock();
                    export::write_closure(&closure, format, &mut out).map_err(CatError::from)?;
                }
            }
        }

        Commands::Stats { input } => {
            let closure = load(&config, input.as_deref())?.run()?;
            print_stats(&closure).into_diagnostic()?;
        }

        Commands::Check { input } => {
            let engine = load(&config, input.as_deref())?;
            let symbols = engine.symbols();
            println!(
                "Symbols: {}, Triples: {}, Input sets: {}",
                symbols.len(),
                engine.triple_count(),
                engine.set_count()
            );
            match symbols.orphan() {
                Some(id) => println!("Orphan marker: {}", symbols.resolve_name(id)),
                None => println!("Orphan marker: (none)"),
            }
            let list: Vec<String> = symbols
                .list_structure()
                .iter()
                .map(|&id| symbols.resolve_name(id))
                .collect();
            println!("List-structure properties: {}", list.join(", "));
            let active = OrphanListExemption::from_table(symbols).is_active();
            println!(
                "Orphan exemption: {}",
                if active { "active" } else { "inactive" }
            );
        }
    }

    Ok(())
}

/// Read the input document and load it into a fresh engine.
fn load(config: &Config, input: Option<&Path>) -> Result<Engine> {
    let doc = match input {
        Some(path) if path != Path::new("-") => InputDocument::read_path(path),
        _ => InputDocument::read_from(std::io::stdin().lock(), "<stdin>"),
    }
    .map_err(CatError::from)?;
    Ok(Engine::from_document(config.engine_config(), &doc)?)
}

fn check_closure(closure: &Closure) -> Result<()> {
    let policy = OrphanListExemption::from_table(closure.symbols());
    let violations = verify::verify(closure, &policy);
    if let Some(first) = violations.first() {
        return Err(CatError::from(EngineError::VerificationFailed {
            count: violations.len(),
            first: first.to_string(),
        })
        .into());
    }
    tracing::info!(rules = closure.rules().len(), "closure verified");
    Ok(())
}

fn print_stats(closure: &Closure) -> std::io::Result<()> {
    let stats = closure.stats();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", closure.info())?;
    writeln!(out, "Frontier steps:         {}", stats.frontier_steps)?;
    writeln!(out, "Refinements:            {}", stats.refinements)?;
    writeln!(out, "Vacuous:                {}", stats.vacuous)?;
    writeln!(out, "Orphan suppressed:      {}", stats.orphan_suppressed)?;
    writeln!(out, "Degenerate projections: {}", stats.degenerate_projections)?;
    writeln!(out, "Subset pairs:           {}", closure.subset_pairs().len())?;
    writeln!(out, "Set sizes:")?;
    for (size, count) in closure.size_histogram() {
        writeln!(out, "{size}\t{count}")?;
    }
    Ok(())
}
