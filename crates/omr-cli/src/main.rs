//! OMR CLI - render and grade bubble answer sheets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Commands::Grade(args) => {
            let args = commands::grade::GradeArgs::with_config(args, &config);
            match commands::grade::run(&args) {
                Ok(summary) => summary.exit_code,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        Commands::Layout(args) => {
            let args = commands::layout::LayoutArgs::with_config(args, &config);
            report(commands::layout::run(&args))
        }
        Commands::Render(args) => {
            let args = commands::render::RenderArgs::with_config(args, &config);
            report(commands::render::run(&args))
        }
    };

    exit_code.into()
}

fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
