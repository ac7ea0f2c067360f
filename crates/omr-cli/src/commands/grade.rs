//! Grade command - detect and score marked bubbles on scanned sheets.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use omr_adapters::{load_exam, FsImageSource, JsonlResultStore};
use omr_core::{
    Exam, Grader, GraderConfig, GradingResult, ImageSource, OmrError, ProgressEvent, ProgressSink,
    ResultOutput,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Parse and validate a fill threshold (0.0-1.0).
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Arguments for sheet grading.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GradeArgs {
    /// Exam definition (JSON)
    #[arg(long, value_name = "FILE")]
    pub exam: PathBuf,

    /// Sheet images or directories to grade
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Luma below which a pixel counts as ink (0-255)
    #[arg(long, value_name = "N")]
    pub luminance_threshold: Option<u8>,

    /// Dark fraction above which a bubble counts as filled (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub fill_threshold: Option<f64>,

    /// Append every result to this JSON Lines file
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl GradeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.luminance_threshold = args
            .luminance_threshold
            .or(config.grading.luminance_threshold);
        args.fill_threshold = args.fill_threshold.or(config.grading.fill_threshold);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        if args.store.is_none() {
            args.store.clone_from(&config.output.store);
        }

        args
    }

    /// Grader thresholds with fallback to the engine defaults.
    fn grader_config(&self) -> GraderConfig {
        let defaults = GraderConfig::default();
        GraderConfig {
            luminance_threshold: self
                .luminance_threshold
                .unwrap_or(defaults.luminance_threshold),
            fill_threshold: self.fill_threshold.unwrap_or(defaults.fill_threshold),
        }
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Outcome of a grading run.
#[derive(Debug)]
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct GradeSummary {
    /// Number of sheets graded.
    pub processed: usize,
    /// Number of sheets skipped.
    pub skipped: usize,
    /// Number of sheets with at least one undetected question.
    pub needs_review: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the grade command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &GradeArgs) -> Result<GradeSummary> {
    info!("Running grade command on {} paths", args.paths.len());

    let exam = load_exam(&args.exam)?;
    if exam.questions.is_empty() {
        return Err(OmrError::EmptyExam)
            .with_context(|| format!("Cannot grade against {}", args.exam.display()));
    }

    let grader = Grader::new(args.grader_config());
    debug!("Grader thresholds: {:?}", grader.config());

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let stdout = JsonOutput::stdout();
    let store = args.store.as_ref().map(JsonlResultStore::open).transpose()?;

    let mut outputs: Vec<&dyn ResultOutput> = Vec::new();
    if args.format() == OutputFormat::Jsonl {
        outputs.push(&stdout);
    }
    if let Some(store) = &store {
        outputs.push(store);
    }

    let (summary, results) = grade_all(&source, &exam, &grader, &outputs, &progress_bar)?;

    if args.format() == OutputFormat::Json {
        stdout.write_array(&results, args.pretty)?;
        stdout.flush()?;
    }

    Ok(summary)
}

/// Grades every image from `source`, writing each result to `outputs`.
///
/// Images that fail to load or have no pixels are reported as skipped and do
/// not abort the batch. All results are also returned in input order.
fn grade_all(
    source: &dyn ImageSource,
    exam: &Exam,
    grader: &Grader,
    outputs: &[&dyn ResultOutput],
    progress: &dyn ProgressSink,
) -> Result<(GradeSummary, Vec<GradingResult>)> {
    let total = source.count_hint();
    let mut skipped = 0usize;
    let mut needs_review = 0usize;
    let mut results = Vec::new();

    for (index, image_result) in source.images().enumerate() {
        let image = match image_result {
            Ok(img) => img,
            Err(e) => {
                warn!("Skipping image {index}: {e:#}");
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("image {index}"),
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            path: image.path.clone(),
            index,
            total,
        });

        let result = match grader.grade(exam, &image, iso_timestamp()) {
            Ok(result) => result,
            Err(e @ OmrError::InvalidImage { .. }) => {
                warn!("Skipping {}: {e}", image.path);
                progress.on_event(ProgressEvent::Skipped {
                    path: image.path.clone(),
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to grade {}", image.path));
            }
        };

        if result.undetected_count() > 0 {
            needs_review += 1;
        }

        for output in outputs {
            output.write(&result)?;
        }

        progress.on_event(ProgressEvent::Graded {
            result: result.clone(),
        });
        results.push(result);
    }

    for output in outputs {
        output.flush()?;
    }

    let processed = results.len();
    progress.on_event(ProgressEvent::Finished { processed, skipped });

    let exit_code = if needs_review > 0 {
        ExitCode::NeedsReview
    } else {
        ExitCode::Success
    };

    Ok((
        GradeSummary {
            processed,
            skipped,
            needs_review,
            exit_code,
        },
        results,
    ))
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use omr_test_support::{
        sample_exam, zero_area_image, MockImageSource, MockProgressSink, MockResultOutput,
        SyntheticSheetBuilder,
    };

    fn args() -> GradeArgs {
        GradeArgs {
            exam: PathBuf::from("exam.json"),
            paths: vec![PathBuf::from("scans")],
            recursive: false,
            luminance_threshold: None,
            fill_threshold: None,
            store: None,
            progress: false,
            quiet: false,
            format: None,
            pretty: false,
        }
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("0.5"), Ok(0.5));
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("half").is_err());
    }

    #[test]
    fn test_config_fills_unset_args() {
        let config: AppConfig = toml::from_str(
            r"
[general]
recursive = true

[grading]
luminance_threshold = 90
fill_threshold = 0.5

[output]
format = 'json'
store = 'grades.jsonl'
",
        )
        .unwrap();

        let args = GradeArgs::with_config(args(), &config);
        assert!(args.recursive);
        assert_eq!(args.format(), OutputFormat::Json);
        assert_eq!(args.store, Some(PathBuf::from("grades.jsonl")));
        assert_eq!(
            args.grader_config(),
            GraderConfig {
                luminance_threshold: 90,
                fill_threshold: 0.5
            }
        );
    }

    #[test]
    fn test_cli_wins_over_config() {
        let config: AppConfig = toml::from_str(
            r"
[grading]
fill_threshold = 0.5

[output]
format = 'json'
",
        )
        .unwrap();

        let mut cli = args();
        cli.fill_threshold = Some(0.2);
        cli.format = Some(OutputFormat::Jsonl);

        let args = GradeArgs::with_config(cli, &config);
        assert_eq!(args.format(), OutputFormat::Jsonl);
        assert!((args.grader_config().fill_threshold - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_defaults_without_config() {
        let args = GradeArgs::with_config(args(), &AppConfig::default());
        assert_eq!(args.format(), OutputFormat::Jsonl);
        assert_eq!(args.grader_config(), GraderConfig::default());
    }

    #[test]
    fn test_grade_all_reports_and_writes_each_sheet() {
        let exam = sample_exam();
        let perfect = SyntheticSheetBuilder::new(&exam)
            .answer_key()
            .path("perfect.png")
            .build()
            .unwrap();
        let partial = SyntheticSheetBuilder::new(&exam)
            .mark(1, "B")
            .mark(2, "F")
            .path("partial.png")
            .build()
            .unwrap();
        let source = MockImageSource::new(vec![perfect, partial, zero_area_image()])
            .with_failure("torn scan");
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let (summary, results) =
            grade_all(&source, &exam, &Grader::default(), &[&output], &progress).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.needs_review, 1);
        assert_eq!(summary.exit_code, ExitCode::NeedsReview);

        assert_eq!(results.len(), 2);
        assert_eq!(output.results(), results);
        assert_eq!(output.flush_count(), 1);

        assert_eq!(progress.scores(), vec![5, 1]);
        assert_eq!(progress.skipped_count(), 2);
        assert_eq!(progress.finished_counts(), Some((2, 2)));
    }

    #[test]
    fn test_grade_all_clean_batch_succeeds() {
        let exam = sample_exam();
        let sheet = SyntheticSheetBuilder::new(&exam)
            .answer_key()
            .build()
            .unwrap();
        let source = MockImageSource::new(vec![sheet]);

        let (summary, _) = grade_all(
            &source,
            &exam,
            &Grader::default(),
            &[],
            &MockProgressSink::new(),
        )
        .unwrap();
        assert_eq!(summary.exit_code, ExitCode::Success);
    }
}
