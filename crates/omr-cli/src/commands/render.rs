//! Render command - rasterize a printable (optionally filled-in) sheet.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use omr_adapters::load_exam;
use omr_core::render::{render_sheet, DEFAULT_PAGE};
use omr_core::PageSize;
use tracing::info;

use super::parse_dimension;
use crate::config::AppConfig;

/// Parse a `N=LABEL` mark.
fn parse_mark(s: &str) -> Result<(u32, String), String> {
    let (number, label) = s
        .split_once('=')
        .ok_or_else(|| format!("'{s}' is not of the form N=LABEL"))?;
    let number = number
        .trim()
        .parse()
        .map_err(|_| format!("'{number}' is not a question number"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(format!("'{s}' has an empty label"));
    }
    Ok((number, label.to_string()))
}

/// Arguments for sheet rendering.
#[derive(Args, Clone)]
pub struct RenderArgs {
    /// Exam definition (JSON)
    #[arg(long, value_name = "FILE")]
    pub exam: PathBuf,

    /// Image file to write; the format follows the extension
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Page width in pixels [default: 1240]
    #[arg(long, value_parser = parse_dimension)]
    pub width: Option<u32>,

    /// Page height in pixels [default: 1754]
    #[arg(long, value_parser = parse_dimension)]
    pub height: Option<u32>,

    /// Fill in a bubble, e.g. `--mark 3=B` (repeatable)
    #[arg(long = "mark", value_name = "N=LABEL", value_parser = parse_mark)]
    pub marks: Vec<(u32, String)>,
}

impl RenderArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.width = args.width.or(config.render.width);
        args.height = args.height.or(config.render.height);
        args
    }
}

/// Run the render command.
pub fn run(args: &RenderArgs) -> Result<()> {
    let exam = load_exam(&args.exam)?;
    let page = PageSize::new(
        args.width.unwrap_or(DEFAULT_PAGE.width),
        args.height.unwrap_or(DEFAULT_PAGE.height),
    );
    let marks: BTreeMap<u32, String> = args.marks.iter().cloned().collect();

    let sheet = render_sheet(&exam, page, &marks).context("Failed to render sheet")?;
    sheet
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        "Rendered {} ({} marks) to {}",
        exam.id,
        marks.len(),
        args.output.display()
    );
    Ok(())
}
