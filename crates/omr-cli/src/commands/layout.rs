//! Layout command - dump the resolved bubble geometry of an exam.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use omr_adapters::load_exam;
use omr_core::render::DEFAULT_PAGE;
use omr_core::{resolve_layout, Exam, PageSize, QuestionLayout};
use serde::Serialize;
use tracing::info;

use super::parse_dimension;
use crate::config::AppConfig;
use crate::output::JsonOutput;

/// Arguments for the layout dump.
#[derive(Args, Clone)]
pub struct LayoutArgs {
    /// Exam definition (JSON)
    #[arg(long, value_name = "FILE")]
    pub exam: PathBuf,

    /// Page width in pixels [default: 1240]
    #[arg(long, value_parser = parse_dimension)]
    pub width: Option<u32>,

    /// Page height in pixels [default: 1754]
    #[arg(long, value_parser = parse_dimension)]
    pub height: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl LayoutArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.width = args.width.or(config.render.width);
        args.height = args.height.or(config.render.height);
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        args
    }

    fn page(&self) -> PageSize {
        PageSize::new(
            self.width.unwrap_or(DEFAULT_PAGE.width),
            self.height.unwrap_or(DEFAULT_PAGE.height),
        )
    }
}

/// Resolved geometry of one exam on one page size.
#[derive(Debug, Serialize)]
pub struct LayoutReport {
    /// Exam identifier.
    pub exam_id: String,
    /// Page the geometry was resolved for.
    pub page: PageSize,
    /// Bubble regions per question, in question order.
    pub questions: Vec<QuestionLayout>,
}

impl LayoutReport {
    /// Resolves `exam` on `page`.
    #[must_use]
    pub fn new(exam: &Exam, page: PageSize) -> Self {
        Self {
            exam_id: exam.id.clone(),
            page,
            questions: resolve_layout(&exam.questions, &exam.layout, page),
        }
    }
}

/// Run the layout command.
pub fn run(args: &LayoutArgs) -> Result<()> {
    let exam = load_exam(&args.exam)?;
    let page = args.page();
    info!(
        "Resolving {} questions on {}x{}",
        exam.question_count(),
        page.width,
        page.height
    );

    let output = JsonOutput::stdout();
    output.write_value(&LayoutReport::new(&exam, page), args.pretty)?;
    Ok(())
}
