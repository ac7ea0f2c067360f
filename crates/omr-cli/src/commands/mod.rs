//! CLI command definitions and handlers.

pub mod grade;
pub mod layout;
pub mod render;

use clap::{Parser, Subcommand};

/// OMR - bubble-sheet rendering and grading
#[derive(Parser)]
#[command(name = "omr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Grade scanned answer sheets against an exam
    Grade(grade::GradeArgs),
    /// Print the resolved bubble regions of an exam as JSON
    Layout(layout::LayoutArgs),
    /// Rasterize an answer sheet to an image file
    Render(render::RenderArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every question on every sheet was detected.
    Success,
    /// At least one question was left undetected and needs a human look.
    NeedsReview,
    /// The command failed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::NeedsReview => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}

/// Parse a page dimension, rejecting zero.
pub(crate) fn parse_dimension(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid pixel count"))?;
    if value == 0 {
        Err("page dimensions must be at least 1 pixel".to_string())
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("1240"), Ok(1240));
        assert!(parse_dimension("0").is_err());
        assert!(parse_dimension("-3").is_err());
        assert!(parse_dimension("wide").is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
