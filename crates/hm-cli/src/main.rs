//! hmetrics CLI

mod data;
mod plot;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hmetrics")]
#[command(about = "hmetrics - group comparison plots with pairwise significance annotations")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a box/violin/point plot annotated with pairwise significance
    Plot(plot::PlotArgs),

    /// Run the pairwise tests only and print the normalized rows (pretty JSON)
    Tests(plot::TestsArgs),

    /// Re-render a saved comparison artifact (JSON)
    Render(plot::RenderArgs),

    /// Print version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Plot(args) => plot::cmd_plot(&args),
        Commands::Tests(args) => plot::cmd_tests(&args),
        Commands::Render(args) => plot::cmd_render(&args),
        Commands::Version => {
            println!("hmetrics {}", hm_core::VERSION);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// `error[<kind>]: <message>` on stderr, plus the offending pair when known.
fn report(err: &anyhow::Error) {
    let (kind, pair) = if let Some(e) = err.downcast_ref::<hm_core::Error>() {
        (e.kind(), e.pair().cloned())
    } else if let Some(e) = err.downcast_ref::<hm_viz_render::RenderError>() {
        (e.kind(), None)
    } else if err.downcast_ref::<csv::Error>().is_some() {
        ("input", None)
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        ("io", None)
    } else {
        ("error", None)
    };
    eprintln!("error[{kind}]: {err:#}");
    if let Some(pair) = pair {
        eprintln!("pair: {pair}");
    }
}
