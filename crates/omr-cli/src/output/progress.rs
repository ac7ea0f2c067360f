//! Progress bar adapter using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use omr_core::{ProgressEvent, ProgressSink};

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of items, if known
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise show per-item status
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = if show_bar {
            let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);

            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }

            Some(bar)
        } else {
            None
        };

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { path, index, total } => {
                if let Some(bar) = &self.bar {
                    if let Some(t) = total {
                        bar.set_length(t as u64);
                    }
                    bar.set_position(index as u64);
                    bar.set_message(path);
                }
            }
            ProgressEvent::Graded { result } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                } else {
                    let undetected = result.undetected_count();
                    if undetected > 0 {
                        eprintln!(
                            "{}: {}/{}, {} question(s) need review",
                            result.source, result.score, result.max_score, undetected
                        );
                    }
                }
            }
            ProgressEvent::Skipped { path, reason } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
                eprintln!("WARN: Skipping {path}: {reason}");
            }
            ProgressEvent::Finished { processed, skipped } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!(
                        "Done: {processed} processed, {skipped} skipped"
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use omr_core::Grader;
    use omr_test_support::{blank_image, sample_exam};

    fn events() -> Vec<ProgressEvent> {
        let result = Grader::default()
            .grade(&sample_exam(), &blank_image(1240, 1754), "t0")
            .unwrap();
        vec![
            ProgressEvent::Started {
                path: "blank.png".into(),
                index: 0,
                total: Some(2),
            },
            ProgressEvent::Graded { result },
            ProgressEvent::Skipped {
                path: "image 1".into(),
                reason: "unreadable".into(),
            },
            ProgressEvent::Finished {
                processed: 1,
                skipped: 1,
            },
        ]
    }

    #[test]
    fn test_bar_tracks_position() {
        let progress = ProgressBar::new(Some(2), false, true);
        for event in events() {
            progress.on_event(event);
        }
        let bar = progress.bar.as_ref().unwrap();
        assert_eq!(bar.position(), 2);
        assert!(bar.is_finished());
    }

    #[test]
    fn test_quiet_has_no_bar() {
        let progress = ProgressBar::new(Some(2), true, true);
        assert!(progress.bar.is_none());
        for event in events() {
            progress.on_event(event);
        }
    }
}
